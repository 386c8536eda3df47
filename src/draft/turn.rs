//! Board editing during one turn.

use derive_more::Display;
use im::Vector;

use crate::board::{FlatBoard, PlacementError};
use crate::core::{Game, GameTile, HandOrder, PlayerId, RackTile, TileId};
use crate::rules::engine::acting_seat;
use crate::rules::RuleError;

/// Rejected draft edits.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DraftError {
    #[display("tile {_0} is not in hand")]
    NotInHand(TileId),

    /// Committed tiles and other players' tiles cannot go back to the hand.
    #[display("tile at cell {_0} was not placed this turn")]
    NotPlacedThisTurn(usize),

    #[display("{_0}")]
    Placement(PlacementError),
}

impl std::error::Error for DraftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DraftError::Placement(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PlacementError> for DraftError {
    fn from(err: PlacementError) -> Self {
        DraftError::Placement(err)
    }
}

/// A player's working copy of the board and hand.
///
/// ```
/// use rust_rummy::core::{GameId, GameRng, Player, PlayerId, SequentialTileIds};
/// use rust_rummy::draft::TurnDraft;
/// use rust_rummy::rules::Rules;
///
/// let rules = Rules::default();
/// let game = rules.create(GameId::new(1), Player::new(PlayerId::new(1), "ann"));
/// let game = rules.join(&game, Player::new(PlayerId::new(2), "bob")).unwrap();
/// let game = rules
///     .start(&game, &mut GameRng::new(5), &mut SequentialTileIds::default())
///     .unwrap();
///
/// let turn = game.turn_id.unwrap();
/// let mut draft = TurnDraft::begin(&game, turn).unwrap();
/// let first = draft.hand()[0].id.clone();
/// draft.place_from_hand(&first, 0).unwrap();
/// assert_eq!(draft.hand().len(), 13);
///
/// draft.reset();
/// assert_eq!(draft.hand().len(), 14);
/// ```
#[derive(Clone, Debug)]
pub struct TurnDraft {
    player: PlayerId,
    start_board: FlatBoard,
    start_hand: Vector<GameTile>,
    board: FlatBoard,
    hand: Vector<GameTile>,
}

impl TurnDraft {
    /// Start drafting from the authoritative snapshot.
    ///
    /// Fails unless it is `player`'s turn in a started game.
    pub fn begin(game: &Game, player: PlayerId) -> Result<Self, RuleError> {
        let seat = acting_seat(game, player)?;
        let hand = game.players[seat].hand.clone();
        Ok(Self {
            player,
            start_board: game.board.clone(),
            start_hand: hand.clone(),
            board: game.board.clone(),
            hand,
        })
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    #[must_use]
    pub fn board(&self) -> &FlatBoard {
        &self.board
    }

    #[must_use]
    pub fn hand(&self) -> &Vector<GameTile> {
        &self.hand
    }

    /// Tiles moved from the hand so far.
    pub fn placed(&self) -> impl Iterator<Item = &RackTile> + '_ {
        self.board.placed_by(self.player)
    }

    /// Whether anything differs from the start of the turn.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.board != self.start_board || self.hand != self.start_hand
    }

    /// Move a hand tile onto an empty cell.
    ///
    /// The grid may grow afterwards, so look the tile up by id rather than
    /// assuming it stays at `index`.
    pub fn place_from_hand(&mut self, id: &TileId, index: usize) -> Result<(), DraftError> {
        let position = self
            .hand
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| DraftError::NotInHand(id.clone()))?;

        let tile = self.hand[position].clone();
        self.board.place(index, RackTile::placed_by(tile, self.player))?;
        self.hand.remove(position);
        Ok(())
    }

    /// Rearrange a tile already on the board.
    pub fn move_tile(&mut self, from: usize, to: usize) -> Result<(), DraftError> {
        self.board.move_tile(from, to)?;
        Ok(())
    }

    /// Return a tile placed this turn to the hand.
    pub fn take_back(&mut self, index: usize) -> Result<GameTile, DraftError> {
        match self.board.get(index) {
            Some(tile) if tile.is_placed_by(self.player) => {}
            Some(_) => return Err(DraftError::NotPlacedThisTurn(index)),
            None => return Err(PlacementError::Empty(index).into()),
        }

        let tile = self.board.take(index)?.game_tile;
        self.hand.push_back(tile.clone());
        Ok(tile)
    }

    /// Undo every edit.
    pub fn reset(&mut self) {
        self.board = self.start_board.clone();
        self.hand = self.start_hand.clone();
    }

    pub fn sort_hand(&mut self, order: HandOrder) {
        let mut tiles: Vec<GameTile> = self.hand.iter().cloned().collect();
        crate::core::sort_tiles(&mut tiles, order);
        self.hand = tiles.into_iter().collect();
    }

    /// Board and hand to submit with `Rules::commit`.
    #[must_use]
    pub fn proposal(&self) -> (FlatBoard, Vec<GameTile>) {
        (self.board.clone(), self.hand.iter().cloned().collect())
    }
}
