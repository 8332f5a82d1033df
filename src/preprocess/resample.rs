use image::imageops::{self, FilterType};
use image::GrayImage;
use ndarray::Array2;

use crate::error::{PreprocessError, PreprocessResult};
use crate::grid::IntensityGrid;

/// Shrinks the grid to fit inside a `side` x `side` box, keeping its aspect
/// ratio and filtering with Lanczos3. Grids that already fit are returned
/// unchanged; nothing is ever enlarged.
pub fn thumbnail(grid: &IntensityGrid, side: usize) -> PreprocessResult<IntensityGrid> {
    let (rows, cols) = grid.dim();
    if rows == 0 || cols == 0 {
        return Err(PreprocessError::Resample { rows, cols });
    }
    if rows <= side && cols <= side {
        return Ok(grid.to_owned());
    }

    let scale = (side as f64 / rows as f64).min(side as f64 / cols as f64);
    let new_rows = fit_dimension(rows, scale, side);
    let new_cols = fit_dimension(cols, scale, side);

    let img = GrayImage::from_raw(cols as u32, rows as u32, grid.iter().copied().collect())
        .ok_or(PreprocessError::Resample { rows, cols })?;
    let resized = imageops::resize(&img, new_cols as u32, new_rows as u32, FilterType::Lanczos3);

    Array2::from_shape_vec((new_rows, new_cols), resized.into_raw())
        .map_err(|_| PreprocessError::Resample { rows, cols })
}

fn fit_dimension(len: usize, scale: f64, side: usize) -> usize {
    ((len as f64 * scale).round() as usize).clamp(1, side)
}
