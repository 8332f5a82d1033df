//! Runtime configuration for the pipeline and the recognizer.
//!
//! Every field has a default, so a JSON file only needs the keys it
//! overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Channel index of alpha in an RGBA canvas export.
pub const DEFAULT_INK_CHANNEL: usize = 3;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Output range of the intensity normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min: f32,
    pub max: f32,
}

impl TargetRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// True when `value` lies between the bounds, in either order.
    pub fn contains(&self, value: f32) -> bool {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        (lo..=hi).contains(&value)
    }
}

impl Default for TargetRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Which channel of the decoded image carries the ink opacity.
    pub ink_channel: usize,
    pub target_range: TargetRange,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            ink_channel: DEFAULT_INK_CHANNEL,
            target_range: TargetRange::default(),
        }
    }
}

impl PreprocessConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let TargetRange { min, max } = self.target_range;
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "target range bounds must be finite, got ({min}, {max})"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    pub preprocess: PreprocessConfig,
    /// Top probabilities below this are reported as low confidence.
    pub confidence_threshold: f32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            preprocess: PreprocessConfig::default(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl RecognizerConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.preprocess.validate()?;
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "confidence threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        Ok(())
    }
}
