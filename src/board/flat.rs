//! The shared board as a flat, fixed-stride grid.
//!
//! Cells are stored row-major. The column stride is derived from the cell
//! count via [`grid_dimensions`], so a board never stores its own width.
//!
//! ## Rows
//!
//! A logical row is a maximal run of occupied cells that neither crosses
//! an empty cell nor wraps past the end of a visual grid row:
//!
//! ```
//! use rust_rummy::board::FlatBoard;
//! use rust_rummy::core::{Color, GameTile, LayoutConfig, RackTile, Tile, TileId};
//!
//! let mut board = FlatBoard::new(LayoutConfig::default());
//! for (i, n) in [1u8, 2, 3].into_iter().enumerate() {
//!     let tile = GameTile::new(Tile::number(n, Color::Red), TileId::new(format!("r{n}")));
//!     board.place(i + 1, RackTile::committed(tile)).unwrap();
//! }
//! assert_eq!(board.rows().len(), 1);
//! ```

use derive_more::Display;
use im::Vector;
use serde::{Deserialize, Serialize};

use super::grid::{grid_dimensions, grown_dimensions, initial_dimensions, GridDimensions};
use crate::core::{GameTile, LayoutConfig, PlayerId, RackTile, TileId};

/// Rejected board edits.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum PlacementError {
    #[display("cell {index} is outside a board of {len} cells")]
    OutOfBounds { index: usize, len: usize },
    #[display("cell {_0} is already occupied")]
    Occupied(usize),
    #[display("cell {_0} is empty")]
    Empty(usize),
}

impl std::error::Error for PlacementError {}

/// Row-major grid of optional tiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatBoard {
    cells: Vector<Option<RackTile>>,
    layout: LayoutConfig,
}

impl FlatBoard {
    /// An empty board of the starting size.
    #[must_use]
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            cells: std::iter::repeat(None).take(layout.initial_len()).collect(),
            layout,
        }
    }

    /// A board from raw cells, as a client would submit it.
    #[must_use]
    pub fn from_cells(layout: LayoutConfig, cells: impl IntoIterator<Item = Option<RackTile>>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            layout,
        }
    }

    /// Lay logical rows back out on the smallest grid that fits them.
    ///
    /// Each row starts on a fresh visual row if it would otherwise wrap,
    /// and rows are separated by one empty cell unless a visual row
    /// boundary already separates them. Returns `None` when a row is
    /// wider than any grid the layout can reach.
    #[must_use]
    pub fn from_rows(layout: LayoutConfig, rows: &[Vec<RackTile>]) -> Option<Self> {
        let longest = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut dims = initial_dimensions(&layout);

        loop {
            if dims.columns >= longest {
                if let Some(cells) = lay_out_rows(rows, dims) {
                    return Some(Self { cells, layout });
                }
            } else if layout.column_step == 0 {
                return None;
            }

            let next = grown_dimensions(&layout, dims);
            if next == dims {
                return None;
            }
            dims = next;
        }
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Grid the cell count maps to.
    #[must_use]
    pub fn dimensions(&self) -> GridDimensions {
        grid_dimensions(&self.layout, self.cells.len())
    }

    /// Column stride.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.dimensions().columns
    }

    /// Whether the cell count is exactly a reachable grid size.
    #[must_use]
    pub fn is_full_grid(&self) -> bool {
        self.dimensions().len() == self.cells.len()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RackTile> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn is_occupied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// All cells, empty ones included.
    pub fn cells(&self) -> impl Iterator<Item = Option<&RackTile>> + '_ {
        self.cells.iter().map(Option::as_ref)
    }

    /// Occupied cells in board order.
    pub fn tiles(&self) -> impl Iterator<Item = &RackTile> + '_ {
        self.cells.iter().flatten()
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Cell holding the tile with `id`.
    #[must_use]
    pub fn position_of(&self, id: &TileId) -> Option<usize> {
        self.cells
            .iter()
            .position(|cell| cell.as_ref().is_some_and(|t| t.id() == id))
    }

    /// Tiles tentatively placed by `player`.
    pub fn placed_by(&self, player: PlayerId) -> impl Iterator<Item = &RackTile> + '_ {
        self.tiles().filter(move |t| t.is_placed_by(player))
    }

    /// Tiles with any owner.
    pub fn tentative(&self) -> impl Iterator<Item = &RackTile> + '_ {
        self.tiles().filter(|t| !t.is_committed())
    }

    /// Split into logical rows.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<RackTile>> {
        let columns = self.columns();
        let mut rows = Vec::new();
        let mut current = Vec::new();

        for (index, cell) in self.cells.iter().enumerate() {
            match cell {
                None => flush_row(&mut rows, &mut current),
                Some(tile) => {
                    current.push(tile.clone());
                    if (index + 1) % columns == 0 {
                        flush_row(&mut rows, &mut current);
                    }
                }
            }
        }
        flush_row(&mut rows, &mut current);

        rows
    }

    /// Whether tiles crowd the grid enough that it should grow.
    ///
    /// Compact means: a tile within the first two cells, a tile within the
    /// last two cells, and no gap of three or more empty cells after any
    /// tile. A gap that starts at a visual row boundary only needs two
    /// empty cells. Tiles in the last three cells are not gap-checked.
    #[must_use]
    pub fn is_compact(&self) -> bool {
        let len = self.cells.len();
        let Some(first) = self.cells.iter().position(Option::is_some) else {
            return false;
        };
        if first > 1 {
            return false;
        }

        let last = (0..len).rev().find(|&i| self.is_occupied(i)).unwrap_or(first);
        if last + 3 <= len {
            return false;
        }

        let columns = self.columns();
        (0..len).all(|index| {
            if !self.is_occupied(index) || index + 3 >= len {
                return true;
            }
            let reach = if (index + 1) % columns == 0 { 2 } else { 3 };
            (index + 1..=index + reach).any(|i| self.is_occupied(i))
        })
    }

    /// Grow one step, keeping every tile at its `(row, column)`.
    pub fn grow(&mut self) {
        let old = self.dimensions();
        let new = grown_dimensions(&self.layout, old);

        let mut cells: Vector<Option<RackTile>> =
            std::iter::repeat(None).take(new.len()).collect();
        for (index, cell) in self.cells.iter().enumerate() {
            if let Some(tile) = cell {
                let (row, column) = old.coordinates(index);
                cells.set(new.index(row, column), Some(tile.clone()));
            }
        }

        tracing::debug!(
            from_columns = old.columns,
            from_rows = old.rows,
            to_columns = new.columns,
            to_rows = new.rows,
            "board grown"
        );
        self.cells = cells;
    }

    /// Put a tile into an empty cell, growing the grid if it became compact.
    pub fn place(&mut self, index: usize, tile: RackTile) -> Result<(), PlacementError> {
        self.check_bounds(index)?;
        if self.is_occupied(index) {
            return Err(PlacementError::Occupied(index));
        }

        self.cells.set(index, Some(tile));
        if self.is_compact() {
            self.grow();
        }
        Ok(())
    }

    /// Remove and return the tile at `index`.
    pub fn take(&mut self, index: usize) -> Result<RackTile, PlacementError> {
        self.check_bounds(index)?;
        self.cells.set(index, None).ok_or(PlacementError::Empty(index))
    }

    /// Move a tile between cells.
    pub fn move_tile(&mut self, from: usize, to: usize) -> Result<(), PlacementError> {
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        if !self.is_occupied(from) {
            return Err(PlacementError::Empty(from));
        }
        if from == to {
            return Ok(());
        }
        if self.is_occupied(to) {
            return Err(PlacementError::Occupied(to));
        }

        let tile = self.take(from)?;
        self.place(to, tile)
    }

    /// Same layout with every owner cleared.
    #[must_use]
    pub fn committed(&self) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .map(|cell| cell.clone().map(RackTile::commit))
                .collect(),
            layout: self.layout,
        }
    }

    /// Lift every tile `player` placed this turn.
    ///
    /// Returns the board without them and the lifted tiles in board order.
    #[must_use]
    pub fn without_placements_of(&self, player: PlayerId) -> (Self, Vec<GameTile>) {
        let mut lifted = Vec::new();
        let cells = self
            .cells
            .iter()
            .map(|cell| match cell {
                Some(tile) if tile.is_placed_by(player) => {
                    lifted.push(tile.game_tile.clone());
                    None
                }
                other => other.clone(),
            })
            .collect();

        (
            Self {
                cells,
                layout: self.layout,
            },
            lifted,
        )
    }

    fn check_bounds(&self, index: usize) -> Result<(), PlacementError> {
        if index < self.cells.len() {
            Ok(())
        } else {
            Err(PlacementError::OutOfBounds {
                index,
                len: self.cells.len(),
            })
        }
    }
}

fn flush_row(rows: &mut Vec<Vec<RackTile>>, current: &mut Vec<RackTile>) {
    if !current.is_empty() {
        rows.push(std::mem::take(current));
    }
}

fn lay_out_rows(rows: &[Vec<RackTile>], dims: GridDimensions) -> Option<Vector<Option<RackTile>>> {
    let mut cells = vec![None; dims.len()];
    let mut cursor = 0;

    for row in rows.iter().filter(|r| !r.is_empty()) {
        let column = cursor % dims.columns;
        if column + row.len() > dims.columns {
            cursor += dims.columns - column;
        }
        if cursor + row.len() > dims.len() {
            return None;
        }

        for (offset, tile) in row.iter().enumerate() {
            cells[cursor + offset] = Some(tile.clone());
        }
        cursor += row.len();
        if cursor % dims.columns != 0 {
            cursor += 1;
        }
    }

    Some(cells.into_iter().collect())
}
