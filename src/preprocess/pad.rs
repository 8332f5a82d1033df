use ndarray::{s, Array2};

use crate::grid::IntensityGrid;

/// Zero pixels to add on each side of a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl Margins {
    pub fn uniform(width: usize) -> Self {
        Self {
            top: width,
            bottom: width,
            left: width,
            right: width,
        }
    }
}

pub fn pad_with_zeros(grid: &IntensityGrid, margins: Margins) -> IntensityGrid {
    let (rows, cols) = grid.dim();
    let mut out = Array2::zeros((
        rows + margins.top + margins.bottom,
        cols + margins.left + margins.right,
    ));
    out.slice_mut(s![
        margins.top..margins.top + rows,
        margins.left..margins.left + cols
    ])
    .assign(grid);
    out
}

/// Surrounds the grid with a zero border `width` pixels wide.
pub fn add_border(grid: &IntensityGrid, width: usize) -> IntensityGrid {
    pad_with_zeros(grid, Margins::uniform(width))
}
