//! The shared board.
//!
//! - `grid`: dimensions and growth of the visual grid
//! - `flat`: the flat cell array, row segmentation and compactness

pub mod flat;
pub mod grid;

pub use flat::{FlatBoard, PlacementError};
pub use grid::{grid_dimensions, grown_dimensions, initial_dimensions, is_grid_len, GridDimensions};
