//! Intensity grids and the statistics computed over them.

use ndarray::Array2;

use crate::error::{PreprocessError, PreprocessResult};

/// Per-pixel ink opacity, rows x cols, origin top-left. Zero means no ink.
pub type IntensityGrid = Array2<u8>;

/// Inclusive indices of the smallest rectangle holding every inked pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub first_row: usize,
    pub last_row: usize,
    pub first_col: usize,
    pub last_col: usize,
}

impl BoundingBox {
    /// Returns `None` when the grid is entirely zero.
    pub fn of(grid: &IntensityGrid) -> Option<Self> {
        let mut bbox: Option<Self> = None;
        for ((row, col), &value) in grid.indexed_iter() {
            if value == 0 {
                continue;
            }
            bbox = Some(match bbox {
                None => Self {
                    first_row: row,
                    last_row: row,
                    first_col: col,
                    last_col: col,
                },
                Some(b) => Self {
                    first_row: b.first_row.min(row),
                    last_row: b.last_row.max(row),
                    first_col: b.first_col.min(col),
                    last_col: b.last_col.max(col),
                },
            });
        }
        bbox
    }

    pub fn height(&self) -> usize {
        self.last_row - self.first_row
    }

    pub fn width(&self) -> usize {
        self.last_col - self.first_col
    }
}

/// Intensity-weighted centroid of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterOfMass {
    pub row: f64,
    pub col: f64,
}

impl CenterOfMass {
    /// Returns `None` when the grid carries no mass.
    pub fn of(grid: &IntensityGrid) -> Option<Self> {
        let mut total = 0.0;
        let mut row_moment = 0.0;
        let mut col_moment = 0.0;
        for ((row, col), &value) in grid.indexed_iter() {
            let weight = f64::from(value);
            total += weight;
            row_moment += weight * row as f64;
            col_moment += weight * col as f64;
        }
        (total > 0.0).then(|| Self {
            row: row_moment / total,
            col: col_moment / total,
        })
    }
}

/// Builds a grid from nested rows, rejecting ragged or empty input.
pub fn grid_from_rows(rows: &[Vec<u8>]) -> PreprocessResult<IntensityGrid> {
    let cols = rows.first().map(Vec::len).unwrap_or(0);
    if cols == 0 {
        return Err(PreprocessError::Decode("grid has no pixels".to_string()));
    }
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(PreprocessError::Decode(format!(
            "grid is not rectangular: row {idx} has {} columns, expected {cols}",
            row.len()
        )));
    }
    let flat: Vec<u8> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), cols), flat)
        .map_err(|e| PreprocessError::Decode(e.to_string()))
}
