// src/main.rs
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use burn::backend::NdArray;
use clap::{Args, Parser};
use tracing_subscriber::EnvFilter;

use digitre::decode::{decode_data_url, decode_image_bytes};
use digitre::preprocess::{extract_ink_channel, CanonicalTensor};
use digitre::{describe, CnnClassifier, Recognizer, RecognizerConfig, CANVAS_SIDE};

/// Inference backend
type B = NdArray<f32>;

#[derive(Parser)]
#[command(name = "digitre")]
#[command(about = "Recognize a handwritten digit drawn on a canvas")]
#[command(version)]
struct Cli {
    /// Trained model record (named MessagePack, `.mpk` extension optional).
    #[arg(long)]
    model: PathBuf,

    /// JSON file with recognizer settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report predictions below this probability as low confidence.
    #[arg(long)]
    threshold: Option<f32>,

    /// Lower bound of the normalized intensity range.
    #[arg(long, requires = "range_max", allow_hyphen_values = true)]
    range_min: Option<f32>,

    /// Upper bound of the normalized intensity range.
    #[arg(long, requires = "range_min", allow_hyphen_values = true)]
    range_max: Option<f32>,

    /// Channel of the image carrying the ink (3 = alpha of RGBA).
    #[arg(long)]
    ink_channel: Option<usize>,

    /// Print the canonical 28x28 tensor before the verdict.
    #[arg(long)]
    dump: bool,

    #[command(flatten)]
    input: InputArgs,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Image file (PNG, JPEG, BMP or GIF).
    #[arg(long)]
    image: Option<PathBuf>,

    /// Text file holding a `data:image/png;base64,...` canvas export.
    #[arg(long)]
    data_url: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> anyhow::Result<RecognizerConfig> {
    let mut config = match &cli.config {
        Some(path) => RecognizerConfig::from_json_file(path)?,
        None => RecognizerConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.confidence_threshold = threshold;
    }
    if let (Some(min), Some(max)) = (cli.range_min, cli.range_max) {
        config.preprocess.target_range = digitre::TargetRange::new(min, max);
    }
    if let Some(channel) = cli.ink_channel {
        config.preprocess.ink_channel = channel;
    }
    config.validate()?;
    Ok(config)
}

fn dump_tensor(tensor: &CanonicalTensor) {
    for row in 0..CANVAS_SIDE {
        let line: Vec<String> = (0..CANVAS_SIDE)
            .map(|col| format!("{:.2}", tensor.get(row, col)))
            .collect();
        println!("{}", line.join(" "));
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let device = Default::default();
    let classifier = CnnClassifier::<B>::load(&cli.model, device)
        .with_context(|| format!("loading model {}", cli.model.display()))?;
    let recognizer = Recognizer::new(Arc::new(classifier), config);

    let image = match (&cli.input.image, &cli.input.data_url) {
        (Some(path), _) => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            decode_image_bytes(&bytes)?
        }
        (None, Some(path)) => {
            let payload = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            decode_data_url(&payload)?
        }
        (None, None) => bail!("one of --image or --data-url is required"),
    };

    let grid = extract_ink_channel(&image, config.preprocess.ink_channel)?;
    let result = recognizer
        .tensor(&grid)
        .and_then(|tensor| {
            if cli.dump {
                dump_tensor(&tensor);
            }
            recognizer.recognize_tensor(&tensor)
        });

    println!("{}", describe(&result));
    Ok(())
}
