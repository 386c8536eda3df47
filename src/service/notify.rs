//! Change notification after successful writes.
//!
//! Delivery is fire-and-forget. An observer that dropped its receiver is
//! pruned on the next notification for that game.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

use rustc_hash::FxHashMap;

use crate::core::{Game, GameId};

/// Told about every committed snapshot.
pub trait ChangeNotifier: Send + Sync {
    fn notify(&self, game: &Game);
}

impl<T: ChangeNotifier + ?Sized> ChangeNotifier for Arc<T> {
    fn notify(&self, game: &Game) {
        (**self).notify(game);
    }
}

/// Drops every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl ChangeNotifier for NullNotifier {
    fn notify(&self, _game: &Game) {}
}

/// Per-game fan-out over channels.
#[derive(Debug, Default)]
pub struct Broadcaster {
    subscribers: Mutex<FxHashMap<GameId, Vec<Sender<Game>>>>,
}

impl Broadcaster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every snapshot written for `game` from now on.
    pub fn subscribe(&self, game: GameId) -> Receiver<Game> {
        let (tx, rx) = channel();
        self.lock().entry(game).or_default().push(tx);
        rx
    }

    /// Live subscriptions for `game` as of the last notification.
    #[must_use]
    pub fn subscriber_count(&self, game: GameId) -> usize {
        self.lock().get(&game).map_or(0, Vec::len)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FxHashMap<GameId, Vec<Sender<Game>>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChangeNotifier for Broadcaster {
    fn notify(&self, game: &Game) {
        let mut subscribers = self.lock();
        let Some(senders) = subscribers.get_mut(&game.id) else {
            return;
        };

        senders.retain(|tx| tx.send(game.clone()).is_ok());
        tracing::trace!(game = %game.id, observers = senders.len(), "notified");
        if senders.is_empty() {
            subscribers.remove(&game.id);
        }
    }
}
