use ndarray::Array2;

use crate::config::TargetRange;
use crate::grid::IntensityGrid;

/// Maps intensities from [0, 255] linearly onto `range`.
pub fn rescale(grid: &IntensityGrid, range: TargetRange) -> Array2<f32> {
    let span = range.max - range.min;
    grid.mapv(|v| f32::from(v) / 255.0 * span + range.min)
}
