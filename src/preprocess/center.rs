use tracing::debug;

use super::pad::{pad_with_zeros, Margins};
use crate::error::{PreprocessError, PreprocessResult};
use crate::grid::{CenterOfMass, IntensityGrid};

/// Shifts the ink so its center of mass lands on the middle of a square frame.
///
/// The offset of the center of mass from the frame center is measured
/// against the row count for both axes and truncated toward zero. The frame
/// then grows by twice that offset on the side the mass leans toward, which
/// moves the midpoint onto the mass. Finally the shorter axis is padded
/// until the grid is square, the odd pixel going after the ink.
pub fn center_mass(grid: &IntensityGrid) -> PreprocessResult<IntensityGrid> {
    let com = CenterOfMass::of(grid).ok_or(PreprocessError::EmptyDrawing)?;
    let center = grid.nrows() as f64 / 2.0;
    let row_diff = (com.row - center) as i64;
    let col_diff = (com.col - center) as i64;
    debug!(?com, center, row_diff, col_diff, "centering mass");

    let (top, bottom) = shift_margins(row_diff);
    let (left, right) = shift_margins(col_diff);
    let shifted = pad_with_zeros(
        grid,
        Margins {
            top,
            bottom,
            left,
            right,
        },
    );
    Ok(make_square(&shifted))
}

/// Margins (before, after) that move the midpoint by `diff` pixels.
fn shift_margins(diff: i64) -> (usize, usize) {
    let grow = 2 * diff.unsigned_abs() as usize;
    if diff > 0 {
        (0, grow)
    } else {
        (grow, 0)
    }
}

fn make_square(grid: &IntensityGrid) -> IntensityGrid {
    let (rows, cols) = grid.dim();
    let dim_diff = rows.abs_diff(cols);
    if dim_diff == 0 {
        return grid.to_owned();
    }
    let half_a = dim_diff / 2;
    let half_b = half_a + dim_diff % 2;
    // with a difference of one, half_a is zero and the single pixel goes after
    let margins = if rows > cols {
        Margins {
            left: half_a,
            right: half_b,
            ..Margins::default()
        }
    } else {
        Margins {
            top: half_a,
            bottom: half_b,
            ..Margins::default()
        }
    };
    pad_with_zeros(grid, margins)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_centered(grid: &IntensityGrid) {
        let (rows, cols) = grid.dim();
        assert_eq!(rows, cols, "grid is not square");
        let com = CenterOfMass::of(grid).unwrap();
        let middle = rows as f64 / 2.0;
        assert!((com.row - middle).abs() <= 1.0, "row {} vs {middle}", com.row);
        assert!((com.col - middle).abs() <= 1.0, "col {} vs {middle}", com.col);
    }

    #[test]
    fn off_center_pixel_is_recentered() {
        let mut grid = IntensityGrid::zeros((30, 30));
        grid[[4, 25]] = 255;
        let centered = center_mass(&grid).unwrap();
        assert_eq!(centered.dim(), (52, 52));
        assert_eq!(centered[[26, 26]], 255);
        assert_centered(&centered);
    }

    #[test]
    fn centered_square_is_unchanged() {
        let mut grid = IntensityGrid::zeros((30, 30));
        grid[[15, 15]] = 40;
        assert_eq!(center_mass(&grid).unwrap(), grid);
    }

    #[test]
    fn every_corner_recenters() {
        for (row, col) in [(0, 0), (0, 29), (29, 0), (29, 29), (3, 17), (22, 8)] {
            let mut grid = IntensityGrid::zeros((30, 30));
            grid[[row, col]] = 200;
            assert_centered(&center_mass(&grid).unwrap());
        }
    }

    #[test]
    fn spread_mass_recenters() {
        let mut grid = IntensityGrid::zeros((30, 30));
        grid[[2, 2]] = 255;
        grid[[3, 9]] = 100;
        grid[[7, 4]] = 30;
        assert_centered(&center_mass(&grid).unwrap());
    }

    #[test]
    fn odd_difference_pads_after() {
        let grid = IntensityGrid::from_elem((3, 2), 1);
        let square = make_square(&grid);
        assert_eq!(square.dim(), (3, 3));
        assert_eq!(square.column(2).sum(), 0);
        assert_eq!(square.column(0).sum(), 3);
    }

    #[test]
    fn wide_grid_gains_rows_on_both_sides() {
        let grid = IntensityGrid::from_elem((2, 7), 1);
        let square = make_square(&grid);
        assert_eq!(square.dim(), (7, 7));
        // half_a = 2 above, half_b = 3 below
        assert_eq!(square.row(1).sum(), 0);
        assert_eq!(square.row(2).sum(), 7);
        assert_eq!(square.row(3).sum(), 7);
        assert_eq!(square.row(4).sum(), 0);
    }

    #[test]
    fn empty_grid_has_no_center() {
        let grid = IntensityGrid::zeros((30, 30));
        assert_eq!(center_mass(&grid), Err(PreprocessError::EmptyDrawing));
    }
}
