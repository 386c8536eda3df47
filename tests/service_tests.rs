//! Service tests: the load / transition / compare-and-swap / notify loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use rust_rummy::board::FlatBoard;
use rust_rummy::core::{
    Color, Game, GameId, GameRng, GameTile, Player, PlayerId, SequentialTileIds, Tile, TileId,
};
use rust_rummy::draft::TurnDraft;
use rust_rummy::rules::{RuleError, Rules};
use rust_rummy::service::{
    Broadcaster, ChangeNotifier, GameService, GameStore, MemoryStore, NullNotifier, ServiceError, StoreError,
    Versioned,
};

const ANN: PlayerId = PlayerId::new(1);
const BOB: PlayerId = PlayerId::new(2);

fn service<S: GameStore, N: ChangeNotifier>(
    store: S,
    notifier: N,
) -> GameService<S, N> {
    GameService::new(
        Rules::default(),
        store,
        notifier,
        GameRng::new(42),
        SequentialTileIds::default(),
    )
}

/// Create, seat two players and start.
fn started<S: GameStore, N: ChangeNotifier>(svc: &GameService<S, N>) -> Game {
    let game = svc.create(Player::new(ANN, "ann")).unwrap();
    svc.join(game.id, Player::new(BOB, "bob")).unwrap();
    svc.start(game.id).unwrap()
}

/// Overwrite the acting player's hand with a winning-size opening.
fn rig_opening<S: GameStore>(store: &S, id: GameId) -> Game {
    let current = store.load(id).unwrap();
    let mut game = current.value;
    let turn = game.turn_id.unwrap();
    let seat = game.player_index(turn).unwrap();
    game.players[seat].hand = [
        (Tile::number(10, Color::Red), "r10"),
        (Tile::number(10, Color::Blue), "b10"),
        (Tile::number(10, Color::Black), "k10"),
        (Tile::number(3, Color::Yellow), "y3"),
    ]
    .into_iter()
    .map(|(tile, id)| GameTile::new(tile, TileId::new(id)))
    .collect();
    store.compare_and_swap(id, current.version, game).unwrap().value
}

fn opening_proposal(game: &Game) -> (PlayerId, FlatBoard, Vec<GameTile>) {
    let turn = game.turn_id.unwrap();
    let mut draft = TurnDraft::begin(game, turn).unwrap();
    for (i, id) in ["r10", "b10", "k10"].into_iter().enumerate() {
        draft.place_from_hand(&TileId::new(id), i).unwrap();
    }
    let (board, hand) = draft.proposal();
    (turn, board, hand)
}

// =============================================================================
// Operations
// =============================================================================

/// Test the full path from creation to a committed opening.
#[test]
fn test_create_to_commit() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(store.clone(), NullNotifier);
    let game = started(&svc);

    let game = rig_opening(&*store, game.id);
    let (turn, board, hand) = opening_proposal(&game);
    let next = svc.commit(game.id, turn, &board, &hand).unwrap();

    assert_eq!(next.board.tile_count(), 3);
    assert_eq!(next.player(turn).unwrap().hand_size(), 1);
    assert_eq!(svc.get(game.id).unwrap(), next);
    assert_eq!(svc.games_for_player(BOB), vec![game.id]);
}

/// Test that rejections write nothing and are not retryable.
#[test]
fn test_rejection_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(store.clone(), NullNotifier);
    let game = started(&svc);
    let version = store.load(game.id).unwrap().version;

    let waiting = game.next_player_after(game.turn_id.unwrap()).unwrap();
    let err = svc.draw(game.id, waiting).unwrap_err();

    assert_eq!(err, ServiceError::Rejected(RuleError::NotYourTurn(waiting)));
    assert!(!err.is_retryable());
    assert_eq!(store.load(game.id).unwrap().version, version);
}

/// Test that joining a started game is refused but rejoining is not.
#[test]
fn test_join_after_start() {
    let svc = service(MemoryStore::new(), NullNotifier);
    let game = started(&svc);

    assert_eq!(
        svc.join(game.id, Player::new(PlayerId::new(3), "cy")),
        Err(ServiceError::Rejected(RuleError::AlreadyStarted))
    );
    assert!(svc.join(game.id, Player::new(ANN, "ann")).is_ok());
}

// =============================================================================
// Notifications
// =============================================================================

/// Test that observers see every successful write and nothing else.
#[test]
fn test_observers_follow_writes() {
    let hub = Arc::new(Broadcaster::new());
    let svc = service(MemoryStore::new(), hub.clone());
    let game = svc.create(Player::new(ANN, "ann")).unwrap();
    let updates = hub.subscribe(game.id);

    svc.join(game.id, Player::new(BOB, "bob")).unwrap();
    let started = svc.start(game.id).unwrap();
    let waiting = started.next_player_after(started.turn_id.unwrap()).unwrap();
    assert!(svc.draw(game.id, waiting).is_err());

    let seen: Vec<Game> = updates.try_iter().collect();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].player_count(), 2);
    assert_eq!(seen[1], started);
}

// =============================================================================
// Concurrency
// =============================================================================

/// A store that lets another writer sneak in once between load and write.
struct RacingStore {
    inner: MemoryStore,
    race_next_load: AtomicBool,
}

impl GameStore for RacingStore {
    fn next_game_id(&self) -> GameId {
        self.inner.next_game_id()
    }

    fn load(&self, id: GameId) -> Result<Versioned<Game>, StoreError> {
        let loaded = self.inner.load(id)?;
        if self.race_next_load.swap(false, Ordering::SeqCst) {
            self.inner
                .compare_and_swap(id, loaded.version, loaded.value.clone())?;
        }
        Ok(loaded)
    }

    fn insert(&self, game: Game) -> Result<Versioned<Game>, StoreError> {
        self.inner.insert(game)
    }

    fn compare_and_swap(
        &self,
        id: GameId,
        expected_version: u64,
        game: Game,
    ) -> Result<Versioned<Game>, StoreError> {
        self.inner.compare_and_swap(id, expected_version, game)
    }

    fn games_for_player(&self, player: PlayerId) -> Vec<GameId> {
        self.inner.games_for_player(player)
    }
}

/// Test that a lost race is reported as a retryable conflict and that the
/// retry re-validates against the fresh snapshot.
#[test]
fn test_lost_race_is_retryable() {
    let store = Arc::new(RacingStore {
        inner: MemoryStore::new(),
        race_next_load: AtomicBool::new(false),
    });
    let svc = service(store.clone(), NullNotifier);
    let game = started(&svc);
    let turn = game.turn_id.unwrap();

    store.race_next_load.store(true, Ordering::SeqCst);
    let err = svc.draw(game.id, turn).unwrap_err();
    assert_eq!(err, ServiceError::Conflict(game.id));
    assert!(err.is_retryable());

    let drawn = svc.draw(game.id, turn).unwrap();
    assert_eq!(drawn.player(turn).unwrap().hand_size(), 15);
    assert_eq!(
        svc.draw(game.id, turn),
        Err(ServiceError::Rejected(RuleError::NotYourTurn(turn)))
    );
}

/// Test that two simultaneous commits for one turn cannot both land.
#[test]
fn test_concurrent_commits_single_winner() {
    for _ in 0..20 {
        let store = Arc::new(MemoryStore::new());
        let svc = Arc::new(service(store.clone(), NullNotifier));
        let game = started(&*svc);
        let game = rig_opening(&*store, game.id);
        let (turn, board, hand) = opening_proposal(&game);

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let svc = Arc::clone(&svc);
                let board = board.clone();
                let hand = hand.clone();
                thread::spawn(move || svc.commit(game.id, turn, &board, &hand))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1, "{results:?}");
        for result in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(matches!(
                result,
                ServiceError::Conflict(_) | ServiceError::Rejected(RuleError::NotYourTurn(_))
            ));
        }
        assert_eq!(store.load(game.id).unwrap().value.board.tile_count(), 3);
    }
}
