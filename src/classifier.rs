//! Classifiers that turn a canonical tensor into digit probabilities.

use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use burn::tensor::activation::softmax;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use tracing::info;

use crate::error::ClassifyError;
use crate::model::DigitCnn;
use crate::preprocess::CanonicalTensor;
use crate::{CANVAS_SIDE, NUM_CLASSES};

/// A pre-trained model over 10 digit classes.
///
/// Implementations are shared read-only between request handlers.
pub trait Classifier: Send + Sync {
    /// Probability of each digit 0-9 for the drawing in `tensor`.
    fn predict(&self, tensor: &CanonicalTensor) -> Result<Vec<f32>, ClassifyError>;
}

/// Top class of a probability vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub digit: usize,
    pub probability: f32,
}

impl Prediction {
    /// Picks the most probable digit; the first one wins a tie.
    pub fn from_probabilities(probabilities: &[f32]) -> Result<Self, ClassifyError> {
        if probabilities.len() != NUM_CLASSES {
            return Err(ClassifyError::OutputLength(probabilities.len()));
        }
        let (digit, &probability) = probabilities
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, &f32)>, (idx, p)| match best {
                Some((_, top)) if top >= p => best,
                _ => Some((idx, p)),
            })
            .ok_or(ClassifyError::OutputLength(0))?;
        Ok(Self { digit, probability })
    }

    pub fn percent(&self) -> f32 {
        self.probability * 100.0
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}% probability)", self.digit, self.percent())
    }
}

/// [`DigitCnn`] behind a mutex, so inference calls run one at a time.
pub struct CnnClassifier<B: Backend> {
    model: Mutex<DigitCnn<B>>,
    device: B::Device,
}

impl<B: Backend> CnnClassifier<B> {
    pub fn new(model: DigitCnn<B>, device: B::Device) -> Self {
        Self {
            model: Mutex::new(model),
            device,
        }
    }

    /// Loads trained weights once at startup.
    pub fn load(path: &Path, device: B::Device) -> Result<Self, ClassifyError> {
        let model = DigitCnn::load(path, &device)?;
        info!(path = %path.display(), "loaded digit classifier");
        Ok(Self::new(model, device))
    }
}

impl<B: Backend> Classifier for CnnClassifier<B> {
    fn predict(&self, tensor: &CanonicalTensor) -> Result<Vec<f32>, ClassifyError> {
        // (1, 28, 28, 1) and (1, 1, 28, 28) share a memory order with one channel
        let values = tensor.to_vec();
        let input = Tensor::<B, 1>::from_floats(values.as_slice(), &self.device).reshape([
            1,
            1,
            CANVAS_SIDE,
            CANVAS_SIDE,
        ]);

        let logits = {
            let model = self
                .model
                .lock()
                .map_err(|_| ClassifyError::Inference("model lock poisoned".to_string()))?;
            model.forward(input)
        };
        let probabilities = softmax(logits, 1)
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| ClassifyError::Inference(format!("{e:?}")))?;

        if probabilities.len() != NUM_CLASSES {
            return Err(ClassifyError::OutputLength(probabilities.len()));
        }
        Ok(probabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetRange;
    use crate::grid::IntensityGrid;
    use crate::preprocess::preprocess;
    use approx::assert_relative_eq;
    use burn::backend::NdArray;
    use burn::module::Module;

    type B = NdArray<f32>;

    fn sample_tensor() -> CanonicalTensor {
        let mut grid = IntensityGrid::zeros((120, 120));
        grid.slice_mut(ndarray::s![20..100, 55..62]).fill(255);
        preprocess(&grid, TargetRange::default()).unwrap()
    }

    #[test]
    fn argmax_picks_top_class() {
        let probs = [0.0, 0.1, 0.05, 0.6, 0.05, 0.0, 0.1, 0.05, 0.05, 0.0];
        let prediction = Prediction::from_probabilities(&probs).unwrap();
        assert_eq!(prediction.digit, 3);
        assert_relative_eq!(prediction.probability, 0.6);
    }

    #[test]
    fn argmax_tie_keeps_first() {
        let probs = [0.1; 10];
        assert_eq!(Prediction::from_probabilities(&probs).unwrap().digit, 0);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(matches!(
            Prediction::from_probabilities(&[1.0]),
            Err(ClassifyError::OutputLength(1))
        ));
    }

    #[test]
    fn display_rounds_percent() {
        let prediction = Prediction {
            digit: 7,
            probability: 0.98765,
        };
        assert_eq!(prediction.to_string(), "7 (98.8% probability)");
    }

    #[test]
    fn cnn_outputs_a_distribution() {
        let device = Default::default();
        let classifier = CnnClassifier::<B>::new(DigitCnn::new(&device), device);
        let probs = classifier.predict(&sample_tensor()).unwrap();
        assert_eq!(probs.len(), NUM_CLASSES);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
        assert_relative_eq!(probs.iter().sum::<f32>(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn loads_recorded_weights() {
        let device = Default::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digits");
        let model = DigitCnn::<B>::new(&device);
        model
            .clone()
            .save_file(path.clone(), &crate::model::ModelRecorder::new())
            .unwrap();

        let original = CnnClassifier::<B>::new(model, device);
        let loaded = CnnClassifier::<B>::load(&path, Default::default()).unwrap();
        let tensor = sample_tensor();
        let expected = original.predict(&tensor).unwrap();
        let actual = loaded.predict(&tensor).unwrap();
        for (a, b) in expected.iter().zip(&actual) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
    }
}
