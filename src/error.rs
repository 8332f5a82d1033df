use thiserror::Error;

/// Failures of the normalization pipeline for a single drawing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    /// Malformed payload or an image without the ink channel.
    #[error("failed to decode drawing: {0}")]
    Decode(String),

    /// The grid holds no ink at all.
    #[error("nothing was drawn")]
    EmptyDrawing,

    #[error("cannot resample a {rows}x{cols} grid")]
    Resample { rows: usize, cols: usize },

    #[error("expected a 28x28 grid, got {rows}x{cols}")]
    Shape { rows: usize, cols: usize },
}

/// Failures of the pre-trained classifier.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("failed to load model record {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("classifier returned {0} probabilities, expected 10")]
    OutputLength(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything that can stop a drawing from being recognized.
#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

impl RecognizeError {
    pub fn is_empty_drawing(&self) -> bool {
        matches!(self, Self::Preprocess(PreprocessError::EmptyDrawing))
    }
}

pub type PreprocessResult<T> = Result<T, PreprocessError>;
