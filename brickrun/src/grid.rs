//! Uniform tile grid used for block lookup.
//!
//! Stores one value per cell and converts between world coordinates and
//! cell coordinates.

use crate::math::{Rect, Vec2};

/// A cell in the grid (column, row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Dense grid storing one value per cell.
#[derive(Clone, Debug)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cell_size: f64,
    cells: Vec<T>, // Row-major: [y * width + x]
}

impl<T: Clone> Grid<T> {
    /// Create a new grid with the given dimensions and cell size.
    ///
    /// # Arguments
    /// * `width` - Grid width in cells
    /// * `height` - Grid height in cells
    /// * `cell_size` - Size of each cell in world units
    /// * `default` - Default value for all cells
    pub fn new(width: usize, height: usize, cell_size: f64, default: T) -> Self {
        Self {
            width,
            height,
            cell_size,
            cells: vec![default; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Convert grid coordinates to world position (top-left corner of cell).
    pub fn grid_to_world_top_left(&self, coord: GridCoord) -> Vec2 {
        Vec2::new(
            coord.x as f64 * self.cell_size,
            coord.y as f64 * self.cell_size,
        )
    }

    /// World-space bounds of a cell.
    pub fn cell_bounds(&self, coord: GridCoord) -> Rect {
        Rect::from_position_size(
            self.grid_to_world_top_left(coord),
            Vec2::new(self.cell_size, self.cell_size),
        )
    }

    /// Check if a grid coordinate is valid (within bounds).
    pub fn is_valid(&self, coord: &GridCoord) -> bool {
        coord.x >= 0
            && coord.x < self.width as i32
            && coord.y >= 0
            && coord.y < self.height as i32
    }

    /// Get the cell data at the given coordinate.
    /// Returns `None` if the coordinate is out of bounds.
    pub fn get(&self, coord: GridCoord) -> Option<&T> {
        if !self.is_valid(&coord) {
            return None;
        }
        let index = (coord.y as usize) * self.width + (coord.x as usize);
        self.cells.get(index)
    }

    /// Set the cell data at the given coordinate.
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: GridCoord, value: T) -> bool {
        if !self.is_valid(&coord) {
            return false;
        }
        let index = (coord.y as usize) * self.width + (coord.x as usize);
        self.cells[index] = value;
        true
    }

    /// In-bounds cells touched by `rect`, row-major.
    ///
    /// Cells that only share an edge with `rect` are excluded, matching
    /// [`Rect::intersects`]. Non-finite rectangles yield nothing.
    pub fn cells_overlapping(&self, rect: &Rect) -> impl Iterator<Item = GridCoord> {
        let finite = rect.x.is_finite() && rect.y.is_finite() && rect.w.is_finite() && rect.h.is_finite();
        let (min_x, max_x, min_y, max_y) = if finite && rect.w > 0.0 && rect.h > 0.0 {
            let min_x = (rect.left() / self.cell_size).floor() as i64;
            let min_y = (rect.top() / self.cell_size).floor() as i64;
            // Exclusive upper edge: a right side exactly on a cell boundary stays out.
            let max_x = (rect.right() / self.cell_size).ceil() as i64 - 1;
            let max_y = (rect.bottom() / self.cell_size).ceil() as i64 - 1;
            (
                min_x.max(0),
                max_x.min(self.width as i64 - 1),
                min_y.max(0),
                max_y.min(self.height as i64 - 1),
            )
        } else {
            (0, -1, 0, -1)
        };

        (min_y..=max_y).flat_map(move |y| {
            (min_x..=max_x).map(move |x| GridCoord::new(x as i32, y as i32))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut grid = Grid::new(2, 2, 10.0, false);
        assert!(grid.get(GridCoord::new(2, 0)).is_none());
        assert!(!grid.set(GridCoord::new(-1, 0), true));
        assert!(grid.set(GridCoord::new(1, 1), true));
        assert_eq!(grid.get(GridCoord::new(1, 1)), Some(&true));
    }

    #[test]
    fn cells_overlapping_excludes_touching_cells() {
        let grid = Grid::new(10, 10, 50.0, 0u8);
        // Exactly one cell wide, aligned to the grid.
        let cells: Vec<_> = grid.cells_overlapping(&Rect::new(50.0, 50.0, 50.0, 50.0)).collect();
        assert_eq!(cells, vec![GridCoord::new(1, 1)]);

        let cells: Vec<_> = grid.cells_overlapping(&Rect::new(40.0, 90.0, 20.0, 20.0)).collect();
        assert_eq!(
            cells,
            vec![
                GridCoord::new(0, 1),
                GridCoord::new(1, 1),
                GridCoord::new(0, 2),
                GridCoord::new(1, 2),
            ]
        );
    }

    #[test]
    fn cells_overlapping_clips_to_grid_and_rejects_nan() {
        let grid = Grid::new(2, 2, 10.0, 0u8);
        assert_eq!(grid.cells_overlapping(&Rect::new(-100.0, -100.0, 500.0, 500.0)).count(), 4);
        assert_eq!(grid.cells_overlapping(&Rect::new(f64::NAN, 0.0, 5.0, 5.0)).count(), 0);
        assert_eq!(grid.cells_overlapping(&Rect::new(0.0, 0.0, 0.0, 5.0)).count(), 0);
    }
}
