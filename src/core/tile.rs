//! Tile value types.
//!
//! Three layers identify a tile:
//!
//! - [`Tile`]: a `(value, color)` pair. Two copies of every numbered tile exist.
//! - [`GameTile`]: a `Tile` plus a [`TileId`] naming one physical instance.
//! - [`RackTile`]: a `GameTile` on the board, plus the player who placed it
//!   during the current in-progress turn (`None` once committed).
//!
//! ## Wire format
//!
//! `TileValue` serializes as a bare number. Jokers use [`JOKER_SENTINEL`].
//!
//! ```
//! use rust_rummy::core::{Color, Tile, TileValue};
//!
//! let seven = Tile::number(7, Color::Blue);
//! assert_eq!(seven.value, TileValue::Number(7));
//! assert!(Tile::joker(Color::Red).is_joker());
//! ```

use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Highest numbered tile.
pub const TILES_PER_COLOR: u8 = 13;

/// Numeric value a joker carries on the wire.
pub const JOKER_SENTINEL: u8 = 69;

/// Copies of each numbered tile in a full set.
pub const COPIES_PER_TILE: usize = 2;

/// Tile colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Black,
    Yellow,
}

impl Color {
    /// All colors in set order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Black, Color::Yellow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Black => "black",
            Self::Yellow => "yellow",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a number is neither `1..=13` nor the joker sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[display("invalid tile value {_0}")]
pub struct InvalidTileValue(pub u8);

impl std::error::Error for InvalidTileValue {}

/// Face value of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TileValue {
    /// A numbered tile, `1..=13`.
    Number(u8),
    /// Wildcard.
    Joker,
}

impl TileValue {
    /// The number, or `None` for a joker.
    #[must_use]
    pub const fn number(self) -> Option<u8> {
        match self {
            Self::Number(n) => Some(n),
            Self::Joker => None,
        }
    }

    #[must_use]
    pub const fn is_joker(self) -> bool {
        matches!(self, Self::Joker)
    }
}

impl TryFrom<u8> for TileValue {
    type Error = InvalidTileValue;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            JOKER_SENTINEL => Ok(Self::Joker),
            1..=TILES_PER_COLOR => Ok(Self::Number(raw)),
            other => Err(InvalidTileValue(other)),
        }
    }
}

impl From<TileValue> for u8 {
    fn from(value: TileValue) -> Self {
        match value {
            TileValue::Number(n) => n,
            TileValue::Joker => JOKER_SENTINEL,
        }
    }
}

impl std::fmt::Display for TileValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Joker => f.write_str("joker"),
        }
    }
}

/// A `(value, color)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub value: TileValue,
    pub color: Color,
}

impl Tile {
    #[must_use]
    pub const fn new(value: TileValue, color: Color) -> Self {
        Self { value, color }
    }

    /// A numbered tile.
    ///
    /// Panics if `number` is outside `1..=13`.
    #[must_use]
    pub fn number(number: u8, color: Color) -> Self {
        assert!(
            (1..=TILES_PER_COLOR).contains(&number),
            "Tile number must be 1-13"
        );
        Self::new(TileValue::Number(number), color)
    }

    #[must_use]
    pub const fn joker(color: Color) -> Self {
        Self::new(TileValue::Joker, color)
    }

    #[must_use]
    pub const fn is_joker(&self) -> bool {
        self.value.is_joker()
    }

    /// Points this tile is worth. Jokers score `joker_score`.
    #[must_use]
    pub fn score(&self, joker_score: u32) -> u32 {
        match self.value {
            TileValue::Number(n) => u32::from(n),
            TileValue::Joker => joker_score,
        }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color, self.value)
    }
}

/// The full set: two copies of 1-13 in each color, then two jokers.
#[must_use]
pub fn full_tile_set() -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(Color::ALL.len() * COPIES_PER_TILE * 13 + 2);
    for color in Color::ALL {
        for _ in 0..COPIES_PER_TILE {
            tiles.extend((1..=TILES_PER_COLOR).map(|n| Tile::number(n, color)));
        }
    }
    tiles.push(Tile::joker(Color::Red));
    tiles.push(Tile::joker(Color::Yellow));
    tiles
}

/// Opaque identifier of one physical tile.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(String);

impl TileId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tile instance in play (hand or board).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameTile {
    pub tile: Tile,
    pub id: TileId,
}

impl GameTile {
    #[must_use]
    pub fn new(tile: Tile, id: TileId) -> Self {
        Self { tile, id }
    }

    #[must_use]
    pub fn value(&self) -> TileValue {
        self.tile.value
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.tile.color
    }
}

/// A tile sitting on the board.
///
/// `owner` is set while the tile is a tentative placement of the acting
/// player. Committed tiles have no owner.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RackTile {
    pub game_tile: GameTile,
    #[serde(default)]
    pub owner: Option<PlayerId>,
}

impl RackTile {
    /// A committed board tile.
    #[must_use]
    pub fn committed(game_tile: GameTile) -> Self {
        Self {
            game_tile,
            owner: None,
        }
    }

    /// A tile tentatively placed by `player` this turn.
    #[must_use]
    pub fn placed_by(game_tile: GameTile, player: PlayerId) -> Self {
        Self {
            game_tile,
            owner: Some(player),
        }
    }

    #[must_use]
    pub fn id(&self) -> &TileId {
        &self.game_tile.id
    }

    #[must_use]
    pub fn tile(&self) -> Tile {
        self.game_tile.tile
    }

    #[must_use]
    pub fn is_placed_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.owner.is_none()
    }

    /// Drop the owner, keeping the tile on the board.
    #[must_use]
    pub fn commit(self) -> Self {
        Self::committed(self.game_tile)
    }
}
