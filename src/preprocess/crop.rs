use std::ops::Range;

use ndarray::s;
use tracing::debug;

use crate::error::{PreprocessError, PreprocessResult};
use crate::grid::{BoundingBox, IntensityGrid};
use crate::MIN_CROP_SIDE;

/// Crops a square window around the ink, never narrower than
/// `MIN_CROP_SIDE` plus one pixel of slack on each side.
///
/// The window is centered on the middle of the bounding box. Parts of the
/// window that fall outside the source grid are clamped away, so the result
/// is not square when the ink sits near an edge.
pub fn crop_to_ink(grid: &IntensityGrid) -> PreprocessResult<IntensityGrid> {
    let bbox = BoundingBox::of(grid).ok_or(PreprocessError::EmptyDrawing)?;
    let middle_row = (bbox.first_row + bbox.last_row) / 2;
    let middle_col = (bbox.first_col + bbox.last_col) / 2;

    let length = bbox.height().max(bbox.width()).max(MIN_CROP_SIDE);
    let half_length = length / 2 + 1;

    let (rows, cols) = grid.dim();
    let row_span = clamped_span(middle_row, half_length, rows);
    let col_span = clamped_span(middle_col, half_length, cols);
    debug!(?bbox, ?row_span, ?col_span, "cropping to ink");

    Ok(grid.slice(s![row_span, col_span]).to_owned())
}

/// `[middle - half, middle + half)` intersected with `[0, len)`.
fn clamped_span(middle: usize, half: usize, len: usize) -> Range<usize> {
    middle.saturating_sub(half)..(middle + half).min(len)
}
