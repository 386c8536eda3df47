//! Run and group validation.
//!
//! A row is legal when it has at least three tiles and is either:
//!
//! - a **group**: every numbered tile has the same value and a distinct color
//! - a **run**: every numbered tile has the same color and values climb by
//!   one per position, jokers standing in for the skipped values
//!
//! ```
//! use rust_rummy::core::{Color, Tile};
//! use rust_rummy::rules::{validate_row, RowKind};
//!
//! let row = [
//!     Tile::number(1, Color::Red),
//!     Tile::joker(Color::Red),
//!     Tile::number(3, Color::Red),
//! ];
//! assert_eq!(validate_row(&row), Ok(RowKind::Run));
//! ```

use smallvec::SmallVec;

use super::error::RowError;
use crate::board::FlatBoard;
use crate::core::{Color, Tile};

/// Shortest legal row.
pub const MIN_ROW_LEN: usize = 3;

/// Which formation a legal row is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Group,
    Run,
}

/// Check one logical row.
///
/// Jokers before the first or after the last numbered tile of a run are
/// not bounded to 1..=13, so `[12, 13, J, J]` is a run.
pub fn validate_row(row: &[Tile]) -> Result<RowKind, RowError> {
    if row.len() < MIN_ROW_LEN {
        return Err(RowError::TooShort);
    }

    let numbered: SmallVec<[(u8, Color); 13]> = row
        .iter()
        .filter_map(|t| t.value.number().map(|n| (n, t.color)))
        .collect();

    let Some(&(first_value, first_color)) = numbered.first() else {
        return Ok(RowKind::Group);
    };

    if numbered.iter().all(|&(n, _)| n == first_value) {
        let mut seen: SmallVec<[Color; 4]> = SmallVec::new();
        for &(_, color) in &numbered {
            if seen.contains(&color) {
                return Err(RowError::RepeatedColors);
            }
            seen.push(color);
        }
        return Ok(RowKind::Group);
    }

    if numbered.iter().any(|&(_, c)| c != first_color) {
        return Err(RowError::MixedColors);
    }

    check_stair(row)?;
    Ok(RowKind::Run)
}

/// Each numbered tile must sit exactly one step per position above the
/// previous numbered tile.
fn check_stair(row: &[Tile]) -> Result<(), RowError> {
    let mut previous: Option<usize> = None;
    let mut jokers_since = 0usize;

    for tile in row {
        match tile.value.number() {
            None => jokers_since += 1,
            Some(n) => {
                let n = usize::from(n);
                if let Some(prev) = previous {
                    if n != prev + jokers_since + 1 {
                        return Err(RowError::InvalidStair);
                    }
                }
                previous = Some(n);
                jokers_since = 0;
            }
        }
    }

    Ok(())
}

/// Check every logical row of a board, stopping at the first bad one.
pub fn validate_board(board: &FlatBoard) -> Result<(), RowError> {
    for row in board.rows() {
        let tiles: SmallVec<[Tile; 13]> = row.iter().map(|t| t.tile()).collect();
        validate_row(&tiles)?;
    }
    Ok(())
}
