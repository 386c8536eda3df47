//! Game transitions.
//!
//! [`Rules`] turns one `Game` snapshot into the next, or rejects the
//! operation. Nothing is written here: every method takes the current
//! snapshot by reference and returns a new one, so a rejected operation
//! leaves no trace.
//!
//! ## Lifecycle
//!
//! ```text
//! not_started --start--> started --commit (hand empty)--> finished
//!      ^  |                 |  ^
//!      join                 draw / commit
//! ```
//!
//! ## Commit checks, in order
//!
//! 1. Tiles owned by the acting player exist (`NoTilesPlaced`)
//! 2. No one else owns tentative tiles, and the acting player's all come
//!    from their hand (`TilesNotOwned`)
//! 3. The board is a whole grid, no smaller than before (`InvalidBoardSize`)
//! 4. Board tile count grew by exactly the placed count (`RackLengthMismatch`)
//! 5. Committed tiles are all still there, unchanged (`CommittedTilesChanged`)
//! 6. Every row is a legal run or group (`InvalidRow`)
//! 7. An opening placement reaches the threshold (`InsufficientFirstMoveScore`)
//! 8. The new hand is the old hand minus the placed tiles (`HandMismatch`)

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::error::RuleError;
use super::row::validate_board;
use super::score::placement_score;
use crate::board::FlatBoard;
use crate::core::{
    full_tile_set, Game, GameId, GamePhase, GameRng, GameTile, Player, PlayerId, RulesConfig,
    Tile, TileId, TileIdSource,
};

/// The rules of one table.
#[derive(Clone, Debug, Default)]
pub struct Rules {
    config: RulesConfig,
}

impl Rules {
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// A new game with `creator` seated alone.
    #[must_use]
    pub fn create(&self, id: GameId, creator: Player) -> Game {
        Game::new(id, Player::new(creator.id, creator.name), self.config.layout)
    }

    /// Seat a player.
    ///
    /// A player who is already seated gets the game back unchanged, in any
    /// phase.
    pub fn join(&self, game: &Game, player: Player) -> Result<Game, RuleError> {
        if game.has_player(player.id) {
            return Ok(game.clone());
        }
        if game.phase != GamePhase::NotStarted {
            return Err(RuleError::AlreadyStarted);
        }
        if game.player_count() >= self.config.max_players {
            return Err(RuleError::GameFull);
        }

        let mut next = game.clone();
        next.players.push_back(Player::new(player.id, player.name));
        Ok(next)
    }

    /// Shuffle, deal, and pick who goes first.
    pub fn start(
        &self,
        game: &Game,
        rng: &mut GameRng,
        ids: &mut dyn TileIdSource,
    ) -> Result<Game, RuleError> {
        if game.phase != GamePhase::NotStarted {
            return Err(RuleError::AlreadyStarted);
        }
        let have = game.player_count();
        if have < self.config.min_players {
            return Err(RuleError::NotEnoughPlayers {
                have,
                need: self.config.min_players,
            });
        }
        if have > self.config.max_players {
            return Err(RuleError::TooManyPlayers {
                have,
                max: self.config.max_players,
            });
        }

        let mut tiles = full_tile_set();
        rng.shuffle(&mut tiles);

        let mut next = game.clone();
        for player in next.players.iter_mut() {
            let deal = self.config.tiles_per_player.min(tiles.len());
            player.hand = tiles
                .drain(..deal)
                .map(|tile| GameTile::new(tile, ids.next_id()))
                .collect();
            player.has_made_first_move = false;
        }

        let first = next.players[rng.index(have)].id;
        next.pool = tiles.into_iter().collect();
        next.board = FlatBoard::new(self.config.layout);
        next.phase = GamePhase::Started;
        next.turn_id = Some(first);
        next.winner_id = None;

        debug!(game = %game.id, players = have, first = %first, pool = next.pool.len(), "game started");
        Ok(next)
    }

    /// Draw one random tile from the pool and pass the turn.
    ///
    /// With an empty pool the turn passes without a tile.
    pub fn draw(
        &self,
        game: &Game,
        player: PlayerId,
        rng: &mut GameRng,
        ids: &mut dyn TileIdSource,
    ) -> Result<Game, RuleError> {
        let seat = acting_seat(game, player)?;

        let mut next = game.clone();
        if next.pool.is_empty() {
            debug!(game = %game.id, player = %player, "pool empty, passing");
        } else {
            let tile = next.pool.remove(rng.index(next.pool.len()));
            next.players[seat].hand.push_back(GameTile::new(tile, ids.next_id()));
        }
        next.turn_id = game.next_player_after(player);
        Ok(next)
    }

    /// End a turn with a proposed board and the hand left after it.
    pub fn commit(
        &self,
        game: &Game,
        player: PlayerId,
        proposed_board: &FlatBoard,
        proposed_hand: &[GameTile],
    ) -> Result<Game, RuleError> {
        let seat = acting_seat(game, player)?;
        let acting = &game.players[seat];
        let board = FlatBoard::from_cells(self.config.layout, proposed_board.cells().map(|c| c.cloned()));

        let placed = placed_tiles(&board, player)?;
        check_placed_from_hand(acting, &placed)?;

        let old_len = game.board.len();
        if !board.is_full_grid() || board.len() < old_len {
            return Err(RuleError::InvalidBoardSize(board.len()));
        }

        let old_count = game.board.tile_count();
        let new_count = board.tile_count();
        if new_count != old_count + placed.len() {
            return Err(RuleError::RackLengthMismatch {
                expected: old_count + placed.len(),
                actual: new_count,
            });
        }

        check_committed_unchanged(&game.board, &board)?;
        validate_board(&board)?;

        if !acting.has_made_first_move {
            let score = placement_score(placed.iter().map(|t| &t.tile), self.config.joker_score);
            if score < self.config.first_move_score {
                return Err(RuleError::InsufficientFirstMoveScore {
                    score,
                    required: self.config.first_move_score,
                });
            }
        }

        check_hand(acting, &placed, proposed_hand)?;

        let mut next = game.clone();
        next.board = board.committed();
        let seated = &mut next.players[seat];
        seated.hand = proposed_hand.iter().cloned().collect();
        seated.has_made_first_move = true;
        let emptied = seated.has_empty_hand();
        next.turn_id = game.next_player_after(player);

        if emptied {
            next.phase = GamePhase::Finished;
            next.winner_id = Some(player);
            debug!(game = %game.id, winner = %player, "game finished");
        }
        Ok(next)
    }
}

/// Seat of `player`, if they may act now.
pub(crate) fn acting_seat(game: &Game, player: PlayerId) -> Result<usize, RuleError> {
    match game.phase {
        GamePhase::NotStarted => return Err(RuleError::NotStarted),
        GamePhase::Finished => return Err(RuleError::GameFinished),
        GamePhase::Started => {}
    }
    if !game.is_players_turn(player) {
        return Err(RuleError::NotYourTurn(player));
    }
    game.player_index(player).ok_or(RuleError::PlayerNotFound(player))
}

/// Tiles the acting player placed this turn.
///
/// Having none wins over any other owner's tiles on the board, which are
/// tampering.
fn placed_tiles(board: &FlatBoard, player: PlayerId) -> Result<Vec<GameTile>, RuleError> {
    let placed: Vec<GameTile> = board.placed_by(player).map(|t| t.game_tile.clone()).collect();
    if placed.is_empty() {
        return Err(RuleError::NoTilesPlaced);
    }
    if board.tentative().any(|t| !t.is_placed_by(player)) {
        return Err(RuleError::TilesNotOwned);
    }
    Ok(placed)
}

fn check_placed_from_hand(acting: &Player, placed: &[GameTile]) -> Result<(), RuleError> {
    let mut seen: FxHashSet<&TileId> = FxHashSet::default();
    for tile in placed {
        let from_hand = acting.hand_tile(&tile.id).is_some_and(|h| h.tile == tile.tile);
        if !from_hand || !seen.insert(&tile.id) {
            return Err(RuleError::TilesNotOwned);
        }
    }
    Ok(())
}

/// Committed tiles may move around, but each must still be on the board
/// with the same face, exactly once.
fn check_committed_unchanged(old: &FlatBoard, new: &FlatBoard) -> Result<(), RuleError> {
    let mut remaining: FxHashMap<&TileId, Tile> =
        old.tiles().map(|t| (t.id(), t.tile())).collect();

    for tile in new.tiles().filter(|t| t.is_committed()) {
        match remaining.remove(tile.id()) {
            Some(face) if face == tile.tile() => {}
            _ => return Err(RuleError::CommittedTilesChanged),
        }
    }

    if remaining.is_empty() {
        Ok(())
    } else {
        Err(RuleError::CommittedTilesChanged)
    }
}

fn check_hand(acting: &Player, placed: &[GameTile], proposed: &[GameTile]) -> Result<(), RuleError> {
    let placed_ids: FxHashSet<&TileId> = placed.iter().map(|t| &t.id).collect();
    let mut expected: FxHashMap<&TileId, Tile> = acting
        .hand
        .iter()
        .filter(|t| !placed_ids.contains(&t.id))
        .map(|t| (&t.id, t.tile))
        .collect();

    if proposed.len() != expected.len() {
        return Err(RuleError::HandMismatch);
    }
    for tile in proposed {
        match expected.remove(&tile.id) {
            Some(face) if face == tile.tile => {}
            _ => return Err(RuleError::HandMismatch),
        }
    }
    Ok(())
}

/// Hand left after placing `placed`, in the original order.
#[must_use]
pub fn hand_after(player: &Player, placed: &[GameTile]) -> Vector<GameTile> {
    player
        .hand
        .iter()
        .filter(|t| !placed.iter().any(|p| p.id == t.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, RackTile, SequentialTileIds};
    use crate::rules::RowError;

    const ANN: PlayerId = PlayerId::new(1);
    const BOB: PlayerId = PlayerId::new(2);

    fn rules() -> Rules {
        Rules::default()
    }

    fn lobby() -> Game {
        let rules = rules();
        let game = rules.create(GameId::new(1), Player::new(ANN, "ann"));
        rules.join(&game, Player::new(BOB, "bob")).unwrap()
    }

    /// A started game where Ann is to move and holds exactly `hand`.
    fn started_with_hand(hand: &[(Tile, &str)]) -> Game {
        let mut game = lobby();
        game.phase = GamePhase::Started;
        game.turn_id = Some(ANN);
        game.players[0].hand = hand
            .iter()
            .map(|(tile, id)| GameTile::new(*tile, TileId::new(*id)))
            .collect();
        game.players[1].hand.push_back(GameTile::new(Tile::number(1, Color::Red), TileId::new("bob-1")));
        game
    }

    fn place(board: &mut FlatBoard, game: &Game, ids: &[&str], at: usize) {
        for (offset, id) in ids.iter().enumerate() {
            let tile = game.players[0].hand_tile(&TileId::new(*id)).unwrap().clone();
            board.place(at + offset, RackTile::placed_by(tile, ANN)).unwrap();
        }
    }

    fn sevens() -> Vec<(Tile, &'static str)> {
        vec![
            (Tile::number(7, Color::Red), "r7"),
            (Tile::number(7, Color::Blue), "b7"),
            (Tile::number(7, Color::Black), "k7"),
            (Tile::number(11, Color::Yellow), "y11"),
            (Tile::number(12, Color::Yellow), "y12"),
            (Tile::number(13, Color::Yellow), "y13"),
            (Tile::number(2, Color::Red), "r2"),
        ]
    }

    #[test]
    fn test_create_and_join() {
        let game = lobby();
        assert_eq!(game.player_count(), 2);
        assert_eq!(game.phase, GamePhase::NotStarted);

        let again = rules().join(&game, Player::new(BOB, "bob")).unwrap();
        assert_eq!(again, game);
    }

    #[test]
    fn test_join_full_and_started() {
        let rules = Rules::new(RulesConfig::new().with_players(2, 2));
        let game = rules.create(GameId::new(1), Player::new(ANN, "ann"));
        let game = rules.join(&game, Player::new(BOB, "bob")).unwrap();

        assert_eq!(
            rules.join(&game, Player::new(PlayerId::new(3), "cy")),
            Err(RuleError::GameFull)
        );

        let mut started = game.clone();
        started.phase = GamePhase::Started;
        assert_eq!(
            rules.join(&started, Player::new(PlayerId::new(3), "cy")),
            Err(RuleError::AlreadyStarted)
        );
        assert!(rules.join(&started, Player::new(ANN, "ann")).is_ok());
    }

    #[test]
    fn test_start_deals() {
        let game = lobby();
        let mut rng = GameRng::new(7);
        let mut ids = SequentialTileIds::default();

        let started = rules().start(&game, &mut rng, &mut ids).unwrap();

        assert_eq!(started.phase, GamePhase::Started);
        assert!(started.players.iter().all(|p| p.hand_size() == 14));
        assert_eq!(started.pool.len(), 106 - 28);
        assert_eq!(started.total_tiles(), 106);
        assert!(started.tile_ids_unique());
        let turn = started.turn_id.unwrap();
        assert!(started.has_player(turn));
    }

    #[test]
    fn test_start_preconditions() {
        let rules = rules();
        let solo = rules.create(GameId::new(1), Player::new(ANN, "ann"));
        let mut rng = GameRng::new(1);
        let mut ids = SequentialTileIds::default();

        assert_eq!(
            rules.start(&solo, &mut rng, &mut ids),
            Err(RuleError::NotEnoughPlayers { have: 1, need: 2 })
        );

        let started = rules.start(&lobby(), &mut rng, &mut ids).unwrap();
        assert_eq!(
            rules.start(&started, &mut rng, &mut ids),
            Err(RuleError::AlreadyStarted)
        );
    }

    #[test]
    fn test_draw_passes_turn() {
        let game = rules()
            .start(&lobby(), &mut GameRng::new(3), &mut SequentialTileIds::default())
            .unwrap();
        let turn = game.turn_id.unwrap();
        let other = game.next_player_after(turn).unwrap();

        let mut ids = SequentialTileIds::new("drawn");
        let next = rules().draw(&game, turn, &mut GameRng::new(4), &mut ids).unwrap();

        assert_eq!(next.player(turn).unwrap().hand_size(), 15);
        assert_eq!(next.pool.len(), game.pool.len() - 1);
        assert_eq!(next.turn_id, Some(other));
        assert!(next.player(turn).unwrap().holds(&TileId::new("drawn-0")));

        assert_eq!(
            rules().draw(&next, turn, &mut GameRng::new(4), &mut ids),
            Err(RuleError::NotYourTurn(turn))
        );
    }

    #[test]
    fn test_draw_from_empty_pool() {
        let game = started_with_hand(&sevens());
        let next = rules()
            .draw(&game, ANN, &mut GameRng::new(1), &mut SequentialTileIds::default())
            .unwrap();
        assert_eq!(next.players[0].hand_size(), 7);
        assert_eq!(next.turn_id, Some(BOB));
    }

    #[test]
    fn test_draw_before_start() {
        assert_eq!(
            rules().draw(&lobby(), ANN, &mut GameRng::new(1), &mut SequentialTileIds::default()),
            Err(RuleError::NotStarted)
        );
    }

    #[test]
    fn test_commit_opening_group() {
        let game = started_with_hand(&sevens());
        let mut board = game.board.clone();
        place(&mut board, &game, &["r7", "b7", "k7"], 0);
        place(&mut board, &game, &["y11", "y12", "y13"], 4);
        let placed: Vec<GameTile> = board.placed_by(ANN).map(|t| t.game_tile.clone()).collect();
        let hand: Vec<GameTile> = hand_after(&game.players[0], &placed).into_iter().collect();

        let next = rules().commit(&game, ANN, &board, &hand).unwrap();

        assert_eq!(next.turn_id, Some(BOB));
        assert!(next.players[0].has_made_first_move);
        assert_eq!(next.players[0].hand_size(), 1);
        assert_eq!(next.board.tile_count(), 6);
        assert_eq!(next.board.tentative().count(), 0);
        assert_eq!(next.phase, GamePhase::Started);
    }

    #[test]
    fn test_commit_rejects_low_opening() {
        let game = started_with_hand(&sevens());
        let mut board = game.board.clone();
        place(&mut board, &game, &["r7", "b7", "k7"], 0);
        let placed: Vec<GameTile> = board.placed_by(ANN).map(|t| t.game_tile.clone()).collect();
        let hand: Vec<GameTile> = hand_after(&game.players[0], &placed).into_iter().collect();

        assert_eq!(
            rules().commit(&game, ANN, &board, &hand),
            Err(RuleError::InsufficientFirstMoveScore {
                score: 21,
                required: 30
            })
        );
    }

    #[test]
    fn test_commit_rejects_invalid_row() {
        let game = started_with_hand(&sevens());
        let mut board = game.board.clone();
        place(&mut board, &game, &["r7", "b7", "r2"], 0);
        let placed: Vec<GameTile> = board.placed_by(ANN).map(|t| t.game_tile.clone()).collect();
        let hand: Vec<GameTile> = hand_after(&game.players[0], &placed).into_iter().collect();

        assert_eq!(
            rules().commit(&game, ANN, &board, &hand),
            Err(RuleError::InvalidRow(RowError::MixedColors))
        );
    }

    #[test]
    fn test_commit_rejects_nothing_placed() {
        let game = started_with_hand(&sevens());
        let hand: Vec<GameTile> = game.players[0].hand.iter().cloned().collect();
        assert_eq!(
            rules().commit(&game, ANN, &game.board, &hand),
            Err(RuleError::NoTilesPlaced)
        );
    }

    #[test]
    fn test_commit_rejects_hand_mismatch() {
        let game = started_with_hand(&sevens());
        let mut board = game.board.clone();
        place(&mut board, &game, &["y11", "y12", "y13"], 0);
        // Claim to still hold every tile.
        let hand: Vec<GameTile> = game.players[0].hand.iter().cloned().collect();

        assert_eq!(
            rules().commit(&game, ANN, &board, &hand),
            Err(RuleError::HandMismatch)
        );
    }

    #[test]
    fn test_commit_rejects_foreign_tiles() {
        let game = started_with_hand(&sevens());
        let mut board = game.board.clone();
        place(&mut board, &game, &["y11", "y12"], 0);
        let stolen = game.players[1].hand[0].clone();
        board.place(2, RackTile::placed_by(stolen, ANN)).unwrap();

        assert_eq!(
            rules().commit(&game, ANN, &board, &[]),
            Err(RuleError::TilesNotOwned)
        );
    }

    #[test]
    fn test_commit_out_of_turn() {
        let game = started_with_hand(&sevens());
        assert_eq!(
            rules().commit(&game, BOB, &game.board, &[]),
            Err(RuleError::NotYourTurn(BOB))
        );
    }

    #[test]
    fn test_commit_emptying_hand_finishes() {
        let game = started_with_hand(&sevens()[3..6]);
        let mut board = game.board.clone();
        place(&mut board, &game, &["y11", "y12", "y13"], 0);

        let next = rules().commit(&game, ANN, &board, &[]).unwrap();

        assert_eq!(next.phase, GamePhase::Finished);
        assert_eq!(next.winner_id, Some(ANN));
        assert!(next.players[0].has_empty_hand());
        assert_eq!(
            rules().draw(&next, BOB, &mut GameRng::new(1), &mut SequentialTileIds::default()),
            Err(RuleError::GameFinished)
        );
    }
}
