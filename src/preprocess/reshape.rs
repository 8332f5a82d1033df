use ndarray::{Array2, Array4};

use crate::error::{PreprocessError, PreprocessResult};
use crate::CANVAS_SIDE;

/// The classifier input: 28x28 values wrapped as batch 1, channel 1,
/// shape (1, 28, 28, 1), row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTensor(Array4<f32>);

impl CanonicalTensor {
    pub const SHAPE: [usize; 4] = [1, CANVAS_SIDE, CANVAS_SIDE, 1];

    pub fn from_grid(grid: &Array2<f32>) -> PreprocessResult<Self> {
        let (rows, cols) = grid.dim();
        if rows != CANVAS_SIDE || cols != CANVAS_SIDE {
            return Err(PreprocessError::Shape { rows, cols });
        }
        Array4::from_shape_vec((1, CANVAS_SIDE, CANVAS_SIDE, 1), grid.iter().copied().collect())
            .map(Self)
            .map_err(|_| PreprocessError::Shape { rows, cols })
    }

    pub fn shape(&self) -> [usize; 4] {
        let (n, h, w, c) = self.0.dim();
        [n, h, w, c]
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[[0, row, col, 0]]
    }

    /// Values in row-major order.
    pub fn to_vec(&self) -> Vec<f32> {
        self.0.iter().copied().collect()
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.0
    }
}
