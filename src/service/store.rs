//! Authoritative storage.
//!
//! A [`GameStore`] holds one versioned snapshot per game. Writes are
//! conditional on the version the writer read, so two writers racing on
//! the same turn cannot both succeed.
//!
//! [`MemoryStore`] keeps `bincode`-encoded snapshots in a mutex-guarded map.
//! Encoding on write means a caller can never mutate stored state through a
//! shared reference.

use std::sync::{Arc, Mutex, PoisonError};

use derive_more::Display;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::core::{Game, GameId, PlayerId};

/// A stored value and the version it was read at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

/// Store failures.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum StoreError {
    #[display("{_0} not found")]
    NotFound(GameId),

    #[display("{id} changed: expected version {expected}, found {actual}")]
    Conflict { id: GameId, expected: u64, actual: u64 },

    #[display("codec error: {_0}")]
    Codec(String),
}

impl std::error::Error for StoreError {}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Codec(err.to_string())
    }
}

/// Versioned game storage.
pub trait GameStore: Send + Sync {
    /// Reserve an id for a game about to be inserted.
    fn next_game_id(&self) -> GameId;

    fn load(&self, id: GameId) -> Result<Versioned<Game>, StoreError>;

    /// Store a new game at version 1. Fails if the id is taken.
    fn insert(&self, game: Game) -> Result<Versioned<Game>, StoreError>;

    /// Replace the game only if it is still at `expected_version`.
    fn compare_and_swap(
        &self,
        id: GameId,
        expected_version: u64,
        game: Game,
    ) -> Result<Versioned<Game>, StoreError>;

    /// Games `player` is seated in, by id.
    fn games_for_player(&self, player: PlayerId) -> Vec<GameId>;
}

impl<T: GameStore + ?Sized> GameStore for Arc<T> {
    fn next_game_id(&self) -> GameId {
        (**self).next_game_id()
    }

    fn load(&self, id: GameId) -> Result<Versioned<Game>, StoreError> {
        (**self).load(id)
    }

    fn insert(&self, game: Game) -> Result<Versioned<Game>, StoreError> {
        (**self).insert(game)
    }

    fn compare_and_swap(
        &self,
        id: GameId,
        expected_version: u64,
        game: Game,
    ) -> Result<Versioned<Game>, StoreError> {
        (**self).compare_and_swap(id, expected_version, game)
    }

    fn games_for_player(&self, player: PlayerId) -> Vec<GameId> {
        (**self).games_for_player(player)
    }
}

#[derive(Debug, Default)]
struct Tables {
    last_id: u64,
    games: FxHashMap<GameId, Record>,
    seats: FxHashMap<PlayerId, FxHashSet<GameId>>,
}

#[derive(Debug)]
struct Record {
    version: u64,
    bytes: Vec<u8>,
}

impl Tables {
    fn write(&mut self, game: &Game, version: u64) -> Result<(), StoreError> {
        let bytes = bincode::serialize(game)?;
        self.games.insert(game.id, Record { version, bytes });
        for player in game.player_ids() {
            self.seats.entry(player).or_default().insert(game.id);
        }
        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a half-written record:
    // records are replaced whole.
    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GameStore for MemoryStore {
    fn next_game_id(&self) -> GameId {
        let mut tables = self.lock();
        tables.last_id += 1;
        GameId::new(tables.last_id)
    }

    fn load(&self, id: GameId) -> Result<Versioned<Game>, StoreError> {
        let tables = self.lock();
        let record = tables.games.get(&id).ok_or(StoreError::NotFound(id))?;
        Ok(Versioned {
            version: record.version,
            value: bincode::deserialize(&record.bytes)?,
        })
    }

    fn insert(&self, game: Game) -> Result<Versioned<Game>, StoreError> {
        let mut tables = self.lock();
        if let Some(existing) = tables.games.get(&game.id) {
            return Err(StoreError::Conflict {
                id: game.id,
                expected: 0,
                actual: existing.version,
            });
        }
        tables.last_id = tables.last_id.max(game.id.raw());
        tables.write(&game, 1)?;
        Ok(Versioned {
            version: 1,
            value: game,
        })
    }

    fn compare_and_swap(
        &self,
        id: GameId,
        expected_version: u64,
        game: Game,
    ) -> Result<Versioned<Game>, StoreError> {
        let mut tables = self.lock();
        let actual = tables.games.get(&id).ok_or(StoreError::NotFound(id))?.version;
        if actual != expected_version {
            return Err(StoreError::Conflict {
                id,
                expected: expected_version,
                actual,
            });
        }

        let version = actual + 1;
        tables.write(&game, version)?;
        Ok(Versioned {
            version,
            value: game,
        })
    }

    fn games_for_player(&self, player: PlayerId) -> Vec<GameId> {
        let tables = self.lock();
        let mut ids: Vec<GameId> = tables
            .seats
            .get(&player)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }
}
