//! Normalization pipeline: ink grid in, canonical 1x28x28x1 tensor out.
//!
//! Stages run strictly in order and each one is a pure function of its input:
//!
//! 1. [`channel`] picks the ink channel out of a decoded image
//! 2. [`crop`] cuts a window around the ink bounding box
//! 3. [`center`] moves the center of mass to the middle of a square frame
//! 4. [`pad`] adds a fixed zero border
//! 5. [`resample`] shrinks the square to 28x28
//! 6. [`normalize`] rescales intensities to the target range
//! 7. [`reshape`] wraps the grid in batch and channel dimensions

pub mod center;
pub mod channel;
pub mod crop;
pub mod normalize;
pub mod pad;
pub mod resample;
pub mod reshape;

use ndarray::Array3;
use tracing::debug;

use crate::config::{PreprocessConfig, TargetRange};
use crate::error::PreprocessResult;
use crate::grid::IntensityGrid;
use crate::{BORDER_WIDTH, CANVAS_SIDE};

pub use center::center_mass;
pub use channel::extract_ink_channel;
pub use crop::crop_to_ink;
pub use normalize::rescale;
pub use pad::add_border;
pub use resample::thumbnail;
pub use reshape::CanonicalTensor;

/// Runs the pipeline on an ink grid.
pub fn preprocess(grid: &IntensityGrid, range: TargetRange) -> PreprocessResult<CanonicalTensor> {
    let cropped = crop_to_ink(grid)?;
    debug!(input = ?grid.dim(), cropped = ?cropped.dim(), "cropped");

    let centered = center_mass(&cropped)?;
    let padded = add_border(&centered, BORDER_WIDTH);
    debug!(centered = ?centered.dim(), padded = ?padded.dim(), "centered and padded");

    let small = thumbnail(&padded, CANVAS_SIDE)?;
    CanonicalTensor::from_grid(&rescale(&small, range))
}

/// Runs the pipeline on a decoded multi-channel image.
pub fn preprocess_image(
    image: &Array3<u8>,
    config: &PreprocessConfig,
) -> PreprocessResult<CanonicalTensor> {
    let grid = extract_ink_channel(image, config.ink_channel)?;
    preprocess(&grid, config.target_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreprocessError;

    #[test]
    fn dot_yields_full_canvas() {
        let mut grid = IntensityGrid::zeros((300, 300));
        grid[[10, 280]] = 255;
        let tensor = preprocess(&grid, TargetRange::default()).unwrap();
        assert_eq!(tensor.shape(), [1, 28, 28, 1]);
    }

    #[test]
    fn blank_canvas_is_empty() {
        let grid = IntensityGrid::zeros((200, 200));
        assert_eq!(
            preprocess(&grid, TargetRange::default()),
            Err(PreprocessError::EmptyDrawing)
        );
    }

    #[test]
    fn rgb_image_lacks_alpha() {
        let image = Array3::<u8>::from_elem((50, 50, 3), 255);
        assert!(matches!(
            preprocess_image(&image, &PreprocessConfig::default()),
            Err(PreprocessError::Decode(_))
        ));
    }
}
