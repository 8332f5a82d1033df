//! Handwritten digit recognition for canvas drawings.
//!
//! A drawing arrives as an ink-opacity grid of any size. [`preprocess`]
//! crops it to the ink, aligns its center of mass, pads, shrinks it to
//! 28x28 and rescales intensities, producing the (1, 28, 28, 1)
//! [`CanonicalTensor`] an MNIST-style classifier expects. A [`Recognizer`]
//! combines that with a shared [`Classifier`] and reports the top digit.

pub mod classifier;
pub mod config;
pub mod decode;
pub mod error;
pub mod grid;
pub mod model;
pub mod preprocess;
pub mod recognizer;

/// Side of the canonical square handed to the classifier.
pub const CANVAS_SIDE: usize = 28;
/// Smallest ink extent the cropper works with, so a dot is never upsampled.
pub const MIN_CROP_SIDE: usize = 28;
/// Zero border added around the centered square before resampling.
pub const BORDER_WIDTH: usize = 15;
pub const NUM_CLASSES: usize = 10;

pub use classifier::{Classifier, CnnClassifier, Prediction};
pub use config::{PreprocessConfig, RecognizerConfig, TargetRange};
pub use error::{ClassifyError, ConfigError, PreprocessError, RecognizeError};
pub use grid::{grid_from_rows, BoundingBox, CenterOfMass, IntensityGrid};
pub use preprocess::{preprocess, preprocess_image, CanonicalTensor};
pub use recognizer::{describe, Recognizer, Verdict};
