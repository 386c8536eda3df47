//! Game identifiers and tile id minting.
//!
//! Every `GameTile` dealt or drawn gets a fresh [`TileId`] from a
//! [`TileIdSource`]. Ids must stay unique for the lifetime of a game.

use serde::{Deserialize, Serialize};

use super::rng::GameRng;
use super::tile::TileId;

/// Identifier of a game record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl GameId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game {}", self.0)
    }
}

/// Mints unique tile ids.
pub trait TileIdSource {
    fn next_id(&mut self) -> TileId;
}

/// `prefix-0`, `prefix-1`, ... Deterministic, handy in tests and replays.
#[derive(Clone, Debug)]
pub struct SequentialTileIds {
    prefix: String,
    next: u64,
}

impl SequentialTileIds {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl Default for SequentialTileIds {
    fn default() -> Self {
        Self::new("tile")
    }
}

impl TileIdSource for SequentialTileIds {
    fn next_id(&mut self) -> TileId {
        let id = TileId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Random 128-bit ids in UUID v4 layout.
#[derive(Clone, Debug)]
pub struct RandomTileIds {
    rng: GameRng,
}

impl RandomTileIds {
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }
}

impl TileIdSource for RandomTileIds {
    fn next_id(&mut self) -> TileId {
        // Set the version (4) and variant (10xx) bits.
        let bits: u128 = (self.rng.next_u128() & !(0xF_u128 << 76) & !(0x3_u128 << 62))
            | (0x4_u128 << 76)
            | (0x2_u128 << 62);
        let hex = format!("{bits:032x}");
        TileId::new(format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        ))
    }
}

impl<T: TileIdSource + ?Sized> TileIdSource for Box<T> {
    fn next_id(&mut self) -> TileId {
        (**self).next_id()
    }
}
