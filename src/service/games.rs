//! Game operations against a store.
//!
//! Every write follows the same path:
//!
//! 1. Load the current snapshot and its version
//! 2. Run the pure transition in `Rules`
//! 3. Compare-and-swap the result against the version read
//! 4. Notify observers
//!
//! A rejected transition writes nothing. A lost race surfaces as
//! [`ServiceError::Conflict`]; re-running the operation re-validates
//! against the fresh snapshot.

use std::sync::{Mutex, PoisonError};

use derive_more::Display;
use tracing::{debug, info, instrument, warn};

use super::notify::ChangeNotifier;
use super::store::{GameStore, StoreError};
use crate::board::FlatBoard;
use crate::core::{Game, GameId, GameRng, GameTile, Player, PlayerId, TileIdSource};
use crate::rules::{standings, RuleError, Rules, Standing};

/// Why a service call did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ServiceError {
    /// The rules refused the operation.
    #[display("rejected: {_0}")]
    Rejected(RuleError),

    /// Another write landed between load and store.
    #[display("{_0} was changed concurrently")]
    Conflict(GameId),

    #[display("store error: {_0}")]
    Store(StoreError),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Rejected(err) => Some(err),
            ServiceError::Store(err) => Some(err),
            ServiceError::Conflict(_) => None,
        }
    }
}

impl From<RuleError> for ServiceError {
    fn from(err: RuleError) -> Self {
        ServiceError::Rejected(err)
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::Rejected(RuleError::GameNotFound(id)),
            StoreError::Conflict { id, .. } => ServiceError::Conflict(id),
            other => ServiceError::Store(other),
        }
    }
}

impl ServiceError {
    /// Whether repeating the same call may succeed.
    ///
    /// Rule rejections are final for the snapshot they were checked against.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ServiceError::Rejected(_))
    }

    /// The rule rejection, if that is what this is.
    #[must_use]
    pub fn rejection(&self) -> Option<&RuleError> {
        match self {
            ServiceError::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// Rules bound to a store and a notifier.
pub struct GameService<S, N> {
    rules: Rules,
    store: S,
    notifier: N,
    rng: Mutex<GameRng>,
    ids: Mutex<Box<dyn TileIdSource + Send>>,
}

impl<S: GameStore, N: ChangeNotifier> GameService<S, N> {
    #[must_use]
    pub fn new(
        rules: Rules,
        store: S,
        notifier: N,
        rng: GameRng,
        ids: impl TileIdSource + Send + 'static,
    ) -> Self {
        Self {
            rules,
            store,
            notifier,
            rng: Mutex::new(rng),
            ids: Mutex::new(Box::new(ids)),
        }
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a new game with `creator` seated.
    #[instrument(skip(self, creator), fields(creator = %creator.id))]
    pub fn create(&self, creator: Player) -> Result<Game, ServiceError> {
        let id = self.store.next_game_id();
        let saved = self.store.insert(self.rules.create(id, creator))?;
        info!(game = %id, "game created");
        self.notifier.notify(&saved.value);
        Ok(saved.value)
    }

    /// Current snapshot.
    pub fn get(&self, game_id: GameId) -> Result<Game, ServiceError> {
        Ok(self.store.load(game_id)?.value)
    }

    /// Games `player` is seated in.
    #[must_use]
    pub fn games_for_player(&self, player: PlayerId) -> Vec<GameId> {
        self.store.games_for_player(player)
    }

    #[instrument(skip(self, player), fields(player = %player.id))]
    pub fn join(&self, game_id: GameId, player: Player) -> Result<Game, ServiceError> {
        self.transition(game_id, |game| self.rules.join(game, player))
    }

    #[instrument(skip(self))]
    pub fn start(&self, game_id: GameId) -> Result<Game, ServiceError> {
        self.transition(game_id, |game| {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
            self.rules.start(game, &mut rng, &mut **ids)
        })
    }

    #[instrument(skip(self))]
    pub fn draw(&self, game_id: GameId, player: PlayerId) -> Result<Game, ServiceError> {
        self.transition(game_id, |game| {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
            self.rules.draw(game, player, &mut rng, &mut **ids)
        })
    }

    #[instrument(skip(self, board, hand))]
    pub fn commit(
        &self,
        game_id: GameId,
        player: PlayerId,
        board: &FlatBoard,
        hand: &[GameTile],
    ) -> Result<Game, ServiceError> {
        self.transition(game_id, |game| self.rules.commit(game, player, board, hand))
    }

    /// Final table for a game.
    pub fn standings(&self, game_id: GameId) -> Result<Vec<Standing>, ServiceError> {
        let game = self.get(game_id)?;
        Ok(standings(&game, self.rules.config().joker_score))
    }

    fn transition(
        &self,
        game_id: GameId,
        apply: impl FnOnce(&Game) -> Result<Game, RuleError>,
    ) -> Result<Game, ServiceError> {
        let current = self.store.load(game_id)?;

        let next = apply(&current.value).map_err(|err| {
            debug!(game = %game_id, %err, "rejected");
            ServiceError::Rejected(err)
        })?;
        if next == current.value {
            return Ok(next);
        }

        let saved = self
            .store
            .compare_and_swap(game_id, current.version, next)
            .map_err(|err| {
                if matches!(err, StoreError::Conflict { .. }) {
                    warn!(game = %game_id, %err, "write lost a race");
                }
                ServiceError::from(err)
            })?;

        info!(game = %game_id, version = saved.version, phase = %saved.value.phase, "game updated");
        self.notifier.notify(&saved.value);
        Ok(saved.value)
    }
}
