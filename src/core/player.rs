//! Player identification and per-player hands.
//!
//! ## PlayerId
//!
//! Opaque identifier assigned by whoever manages sessions. The engine
//! only compares ids; seating order lives in `Game::players`.
//!
//! ## Player
//!
//! A seated player: display name, the tiles in hand, and whether the
//! opening placement threshold has been met.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::tile::{GameTile, TileId, TileValue};

/// External player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Sort orders offered for a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOrder {
    /// Value first, then color. Groups line up.
    ByValue,
    /// Color first, then value. Runs line up.
    ByColor,
}

/// A seated player.
///
/// The hand is a persistent vector so snapshots clone in O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vector<GameTile>,
    #[serde(default)]
    pub has_made_first_move: bool,
}

impl Player {
    /// A player with an empty hand.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Vector::new(),
            has_made_first_move: false,
        }
    }

    /// Number of tiles in hand.
    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    #[must_use]
    pub fn has_empty_hand(&self) -> bool {
        self.hand.is_empty()
    }

    /// Find a tile in hand by id.
    #[must_use]
    pub fn hand_tile(&self, id: &TileId) -> Option<&GameTile> {
        self.hand.iter().find(|t| &t.id == id)
    }

    #[must_use]
    pub fn holds(&self, id: &TileId) -> bool {
        self.hand_tile(id).is_some()
    }

    /// Remove a tile from hand.
    ///
    /// Returns the tile, or `None` if it was not held.
    pub fn take_from_hand(&mut self, id: &TileId) -> Option<GameTile> {
        let pos = self.hand.iter().position(|t| &t.id == id)?;
        Some(self.hand.remove(pos))
    }

    /// Sum of the hand at face value, jokers at `joker_score`.
    #[must_use]
    pub fn hand_score(&self, joker_score: u32) -> u32 {
        self.hand.iter().map(|t| t.tile.score(joker_score)).sum()
    }

    /// Reorder the hand in place.
    pub fn sort_hand(&mut self, order: HandOrder) {
        let mut tiles: Vec<GameTile> = self.hand.iter().cloned().collect();
        sort_tiles(&mut tiles, order);
        self.hand = tiles.into_iter().collect();
    }
}

/// Sort tiles for display. Jokers go last in either order.
pub fn sort_tiles(tiles: &mut [GameTile], order: HandOrder) {
    let value_key = |t: &GameTile| match t.value() {
        TileValue::Number(n) => n,
        TileValue::Joker => u8::MAX,
    };
    match order {
        HandOrder::ByValue => tiles.sort_by_key(|t| (value_key(t), t.color())),
        HandOrder::ByColor => {
            tiles.sort_by_key(|t| (t.tile.is_joker(), t.color(), value_key(t)))
        }
    }
}
