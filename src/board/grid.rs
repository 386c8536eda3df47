//! Grid dimensions and growth.
//!
//! The board starts at `initial_columns x initial_rows` and grows by
//! `(column_step, row_step)` at a time. The dimensions of a flat board are
//! always derived from its length, so a given length maps to exactly one
//! column stride.
//!
//! ```
//! use rust_rummy::board::grid_dimensions;
//! use rust_rummy::core::LayoutConfig;
//!
//! let layout = LayoutConfig::default();
//! assert_eq!(grid_dimensions(&layout, 48).columns, 12);
//! assert_eq!(grid_dimensions(&layout, 49).columns, 15);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::LayoutConfig;

/// Columns and rows of the visual grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub columns: usize,
    pub rows: usize,
}

impl GridDimensions {
    #[must_use]
    pub const fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    /// Cell count.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns * self.rows
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(row, column)` of a flat index.
    #[must_use]
    pub const fn coordinates(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }

    /// Flat index of `(row, column)`.
    #[must_use]
    pub const fn index(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }
}

/// The starting grid.
#[must_use]
pub fn initial_dimensions(layout: &LayoutConfig) -> GridDimensions {
    GridDimensions::new(layout.initial_columns, layout.initial_rows)
}

/// One growth step past `dims`.
#[must_use]
pub fn grown_dimensions(layout: &LayoutConfig, dims: GridDimensions) -> GridDimensions {
    GridDimensions::new(dims.columns + layout.column_step, dims.rows + layout.row_step)
}

/// Smallest grid reachable from the starting grid that holds `len` cells.
///
/// A layout that cannot grow stays at its starting grid.
#[must_use]
pub fn grid_dimensions(layout: &LayoutConfig, len: usize) -> GridDimensions {
    let mut dims = initial_dimensions(layout);
    while dims.len() < len {
        let next = grown_dimensions(layout, dims);
        if next == dims {
            break;
        }
        dims = next;
    }
    dims
}

/// Whether `len` is exactly the cell count of some reachable grid.
#[must_use]
pub fn is_grid_len(layout: &LayoutConfig, len: usize) -> bool {
    grid_dimensions(layout, len).len() == len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let layout = LayoutConfig::default();
        assert_eq!(grid_dimensions(&layout, 48), GridDimensions::new(12, 4));
        assert_eq!(grid_dimensions(&layout, 0), GridDimensions::new(12, 4));
        assert_eq!(grid_dimensions(&layout, 1), GridDimensions::new(12, 4));
    }

    #[test]
    fn test_growth_steps() {
        let layout = LayoutConfig::default();
        assert_eq!(grid_dimensions(&layout, 75), GridDimensions::new(15, 5));
        assert_eq!(grid_dimensions(&layout, 49), GridDimensions::new(15, 5));
        assert_eq!(grid_dimensions(&layout, 108), GridDimensions::new(18, 6));
        assert_eq!(grid_dimensions(&layout, 76), GridDimensions::new(18, 6));
    }

    #[test]
    fn test_is_grid_len() {
        let layout = LayoutConfig::default();
        assert!(is_grid_len(&layout, 48));
        assert!(is_grid_len(&layout, 75));
        assert!(!is_grid_len(&layout, 50));
    }

    #[test]
    fn test_coordinates() {
        let dims = GridDimensions::new(12, 4);
        assert_eq!(dims.coordinates(13), (1, 1));
        assert_eq!(dims.index(1, 1), 13);
    }

    #[test]
    fn test_custom_growth() {
        let layout = LayoutConfig::new(4, 2).with_growth(0, 1);
        assert_eq!(grid_dimensions(&layout, 9), GridDimensions::new(4, 3));
    }
}
