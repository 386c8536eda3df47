//! The authoritative game snapshot.
//!
//! ## Game
//!
//! Everything a store persists for one game:
//! - Seating order and each player's hand
//! - The undrawn pool
//! - The shared board
//! - Phase, creator, whose turn it is, and the winner once finished
//!
//! All collections are `im` persistent structures, so cloning a snapshot
//! before a transition is O(1).

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::config::LayoutConfig;
use super::ids::GameId;
use super::player::{Player, PlayerId};
use super::tile::{Tile, TileId};
use crate::board::FlatBoard;

/// Lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    NotStarted,
    Started,
    Finished,
}

impl GamePhase {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::NotStarted => "not_started",
            GamePhase::Started => "started",
            GamePhase::Finished => "finished",
        }
    }

    /// Turns are being played.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, GamePhase::Started)
    }

    /// No further transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Finished)
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// Seating order. Turns advance through this list circularly.
    pub players: Vector<Player>,
    /// Undrawn tiles. Ids are minted when a tile leaves the pool.
    pub pool: Vector<Tile>,
    pub board: FlatBoard,
    pub phase: GamePhase,
    pub created_by: PlayerId,
    pub turn_id: Option<PlayerId>,
    pub winner_id: Option<PlayerId>,
}

impl Game {
    /// A fresh game with `creator` as its only player.
    #[must_use]
    pub fn new(id: GameId, creator: Player, layout: LayoutConfig) -> Self {
        let created_by = creator.id;
        Self {
            id,
            players: Vector::unit(creator),
            pool: Vector::new(),
            board: FlatBoard::new(layout),
            phase: GamePhase::NotStarted,
            created_by,
            turn_id: None,
            winner_id: None,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Seat index of a player.
    #[must_use]
    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    #[must_use]
    pub fn has_player(&self, id: PlayerId) -> bool {
        self.player_index(id).is_some()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }

    /// The player seated after `id`, wrapping around.
    #[must_use]
    pub fn next_player_after(&self, id: PlayerId) -> Option<PlayerId> {
        let index = self.player_index(id)?;
        let next = (index + 1) % self.players.len();
        Some(self.players[next].id)
    }

    #[must_use]
    pub fn is_players_turn(&self, id: PlayerId) -> bool {
        self.turn_id == Some(id)
    }

    /// Hands, board and pool together.
    #[must_use]
    pub fn total_tiles(&self) -> usize {
        let in_hands: usize = self.players.iter().map(Player::hand_size).sum();
        in_hands + self.board.tile_count() + self.pool.len()
    }

    /// Whether no tile id appears twice across hands and board.
    #[must_use]
    pub fn tile_ids_unique(&self) -> bool {
        let mut seen: FxHashSet<&TileId> = FxHashSet::default();
        let in_hands = self.players.iter().flat_map(|p| p.hand.iter().map(|t| &t.id));
        let on_board = self.board.tiles().map(|t| t.id());
        in_hands.chain(on_board).all(|id| seen.insert(id))
    }
}
