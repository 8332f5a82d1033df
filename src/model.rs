//! The digit CNN behind [`crate::classifier::CnnClassifier`].

use std::path::Path;

use burn::module::Module;
use burn::nn;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::error::ClassifyError;
use crate::{CANVAS_SIDE, NUM_CLASSES};

/// Record format of trained weights on disk.
pub type ModelRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

/// conv -> relu -> pool -> flatten -> linear
#[derive(Module, Debug)]
pub struct DigitCnn<B: Backend> {
    conv1: nn::conv::Conv2d<B>,
    relu: nn::activation::Relu,
    pool: nn::pool::MaxPool2d,
    fc: nn::Linear<B>,
}

impl<B: Backend> DigitCnn<B> {
    const CHANNELS: usize = 8;

    /// Randomly initialized weights, the starting point for loading a record.
    pub fn new(device: &B::Device) -> Self {
        let conv1 = nn::conv::Conv2dConfig::new([1, Self::CHANNELS], [3, 3])
            .with_padding(nn::PaddingConfig2d::Same)
            .init(device);
        let pool = nn::pool::MaxPool2dConfig::new([2, 2]).init();
        let pooled = CANVAS_SIDE / 2;
        let fc = nn::LinearConfig::new(Self::CHANNELS * pooled * pooled, NUM_CLASSES).init(device);

        Self {
            conv1,
            relu: nn::activation::Relu::new(),
            pool,
            fc,
        }
    }

    /// Loads trained weights from a named MessagePack record.
    ///
    /// The recorder adds the `.mpk` extension itself.
    pub fn load(path: &Path, device: &B::Device) -> Result<Self, ClassifyError> {
        Self::new(device)
            .load_file(path, &ModelRecorder::new(), device)
            .map_err(|e| ClassifyError::Load {
                path: path.display().to_string(),
                reason: format!("{e:?}"),
            })
    }

    /// `[batch, 1, 28, 28]` images to `[batch, 10]` logits.
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1.forward(x);
        let x = self.relu.forward(x);
        let x = self.pool.forward(x);
        let x = x.flatten(1, 3);
        self.fc.forward(x)
    }
}
