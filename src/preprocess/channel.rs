use ndarray::{Array3, Axis};

use crate::error::{PreprocessError, PreprocessResult};
use crate::grid::IntensityGrid;

/// Selects the channel carrying ink opacity from a rows x cols x channels image.
///
/// Canvas exports paint every stroke with the same color, so only the alpha
/// channel (index 3 of RGBA) varies.
pub fn extract_ink_channel(image: &Array3<u8>, channel: usize) -> PreprocessResult<IntensityGrid> {
    let (rows, cols, channels) = image.dim();
    if rows == 0 || cols == 0 {
        return Err(PreprocessError::Decode("image has zero area".to_string()));
    }
    if channel >= channels {
        return Err(PreprocessError::Decode(format!(
            "image has {channels} channel(s), ink channel {channel} is missing"
        )));
    }
    Ok(image.index_axis(Axis(2), channel).to_owned())
}
