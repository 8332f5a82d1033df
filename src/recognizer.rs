//! Request-level entry points: drawing in, human-facing verdict out.

use std::sync::Arc;
use std::time::Instant;

use ndarray::Array3;
use rayon::prelude::*;
use tracing::debug;

use crate::classifier::{Classifier, Prediction};
use crate::config::RecognizerConfig;
use crate::decode::decode_data_url;
use crate::error::RecognizeError;
use crate::grid::IntensityGrid;
use crate::preprocess::{extract_ink_channel, preprocess, CanonicalTensor};

pub const NOTHING_DRAWN: &str = "Nothing drawn";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Confident(Prediction),
    /// Top probability fell below the configured threshold.
    LowConfidence(Prediction),
}

impl Verdict {
    pub fn prediction(&self) -> Prediction {
        match *self {
            Self::Confident(p) | Self::LowConfidence(p) => p,
        }
    }

    pub fn is_confident(&self) -> bool {
        matches!(self, Self::Confident(_))
    }

    pub fn message(&self) -> String {
        match self {
            Self::Confident(p) => p.to_string(),
            Self::LowConfidence(p) => format!("Not sure, best guess is {p}"),
        }
    }
}

/// Message shown to the user for any recognition outcome.
pub fn describe(result: &Result<Verdict, RecognizeError>) -> String {
    match result {
        Ok(verdict) => verdict.message(),
        Err(err) if err.is_empty_drawing() => NOTHING_DRAWN.to_string(),
        Err(err) => format!("Could not recognize drawing: {err}"),
    }
}

/// Preprocessing plus a shared classifier handle.
///
/// Cloning is cheap and every clone uses the same classifier, so one
/// recognizer built at startup can be handed to each worker.
pub struct Recognizer<C: Classifier + ?Sized> {
    classifier: Arc<C>,
    config: RecognizerConfig,
}

impl<C: Classifier + ?Sized> Clone for Recognizer<C> {
    fn clone(&self) -> Self {
        Self {
            classifier: Arc::clone(&self.classifier),
            config: self.config,
        }
    }
}

impl<C: Classifier + ?Sized> Recognizer<C> {
    pub fn new(classifier: Arc<C>, config: RecognizerConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn tensor(&self, grid: &IntensityGrid) -> Result<CanonicalTensor, RecognizeError> {
        Ok(preprocess(grid, self.config.preprocess.target_range)?)
    }

    pub fn recognize_tensor(&self, tensor: &CanonicalTensor) -> Result<Verdict, RecognizeError> {
        let started = Instant::now();
        let probabilities = self.classifier.predict(tensor)?;
        let prediction = Prediction::from_probabilities(&probabilities)?;
        debug!(
            digit = prediction.digit,
            probability = prediction.probability,
            elapsed_us = started.elapsed().as_micros() as u64,
            "classified"
        );

        Ok(if prediction.probability < self.config.confidence_threshold {
            Verdict::LowConfidence(prediction)
        } else {
            Verdict::Confident(prediction)
        })
    }

    pub fn recognize_grid(&self, grid: &IntensityGrid) -> Result<Verdict, RecognizeError> {
        let started = Instant::now();
        let tensor = self.tensor(grid)?;
        debug!(elapsed_us = started.elapsed().as_micros() as u64, "preprocessed");
        self.recognize_tensor(&tensor)
    }

    pub fn recognize_image(&self, image: &Array3<u8>) -> Result<Verdict, RecognizeError> {
        let grid = extract_ink_channel(image, self.config.preprocess.ink_channel)?;
        self.recognize_grid(&grid)
    }

    /// Recognizes a canvas export such as `data:image/png;base64,...`.
    pub fn recognize_data_url(&self, payload: &str) -> Result<Verdict, RecognizeError> {
        let image = decode_data_url(payload)?;
        self.recognize_image(&image)
    }

    /// Recognizes independent drawings on the rayon pool, one result each,
    /// in input order.
    pub fn recognize_many(&self, grids: &[IntensityGrid]) -> Vec<Result<Verdict, RecognizeError>> {
        grids.par_iter().map(|grid| self.recognize_grid(grid)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClassifyError, PreprocessError};

    struct Fixed(Vec<f32>);

    impl Classifier for Fixed {
        fn predict(&self, _tensor: &CanonicalTensor) -> Result<Vec<f32>, ClassifyError> {
            Ok(self.0.clone())
        }
    }

    fn one_hot(digit: usize, probability: f32) -> Vec<f32> {
        let rest = (1.0 - probability) / 9.0;
        (0..10)
            .map(|d| if d == digit { probability } else { rest })
            .collect()
    }

    fn stroke() -> IntensityGrid {
        let mut grid = IntensityGrid::zeros((80, 80));
        grid.slice_mut(ndarray::s![10..70, 38..42]).fill(255);
        grid
    }

    fn recognizer(probs: Vec<f32>) -> Recognizer<Fixed> {
        Recognizer::new(Arc::new(Fixed(probs)), RecognizerConfig::default())
    }

    #[test]
    fn confident_prediction() {
        let verdict = recognizer(one_hot(1, 0.9)).recognize_grid(&stroke()).unwrap();
        assert!(verdict.is_confident());
        assert_eq!(verdict.message(), "1 (90.0% probability)");
    }

    #[test]
    fn low_confidence_prediction() {
        let verdict = recognizer(one_hot(4, 0.55)).recognize_grid(&stroke()).unwrap();
        assert_eq!(verdict, Verdict::LowConfidence(verdict.prediction()));
        assert_eq!(verdict.message(), "Not sure, best guess is 4 (55.0% probability)");
    }

    #[test]
    fn empty_drawing_is_distinct() {
        let result = recognizer(one_hot(0, 1.0)).recognize_grid(&IntensityGrid::zeros((50, 50)));
        assert!(matches!(
            result,
            Err(RecognizeError::Preprocess(PreprocessError::EmptyDrawing))
        ));
        assert_eq!(describe(&result), NOTHING_DRAWN);
    }

    #[test]
    fn short_probability_vector_is_an_error() {
        let result = recognizer(vec![1.0; 3]).recognize_grid(&stroke());
        assert!(matches!(
            result,
            Err(RecognizeError::Classify(ClassifyError::OutputLength(3)))
        ));
        assert!(describe(&result).starts_with("Could not recognize drawing"));
    }

    #[test]
    fn many_keeps_order() {
        let recognizer = recognizer(one_hot(8, 0.8));
        let grids = vec![stroke(), IntensityGrid::zeros((40, 40)), stroke()];
        let results = recognizer.recognize_many(&grids);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().unwrap_err().is_empty_drawing());
        assert!(results[2].is_ok());
    }

    #[test]
    fn works_through_trait_object() {
        let classifier: Arc<dyn Classifier> = Arc::new(Fixed(one_hot(2, 0.75)));
        let recognizer = Recognizer::new(classifier, RecognizerConfig::default());
        let verdict = recognizer.clone().recognize_grid(&stroke()).unwrap();
        assert_eq!(verdict.prediction().digit, 2);
    }
}
