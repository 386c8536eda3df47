//! Rejection reasons.
//!
//! Every rule failure is a [`RuleError`]. Row failures carry the
//! [`RowError`] that named the broken formation rule.

use derive_more::Display;

use crate::core::{GameId, PlayerId};

/// Why a single row is not a legal run or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RowError {
    /// Fewer than three tiles.
    #[display("row is too short")]
    TooShort,

    /// A group repeats a color.
    #[display("can't repeat colors")]
    RepeatedColors,

    /// A run mixes colors.
    #[display("can't mix colors")]
    MixedColors,

    /// A run skips or repeats a value.
    #[display("invalid stair")]
    InvalidStair,
}

impl std::error::Error for RowError {}

/// Broad class of a [`RuleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong phase, wrong turn, or an unknown game or player.
    Precondition,
    /// The proposed move breaks a rule. The player may correct it.
    Legality,
}

/// A rejected operation.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RuleError {
    #[display("{_0} not found")]
    GameNotFound(GameId),

    #[display("game already started")]
    AlreadyStarted,

    #[display("not enough players: {have} of {need}")]
    NotEnoughPlayers { have: usize, need: usize },

    #[display("too many players: {have} of at most {max}")]
    TooManyPlayers { have: usize, max: usize },

    #[display("game is full")]
    GameFull,

    #[display("game not started")]
    NotStarted,

    #[display("game is finished")]
    GameFinished,

    #[display("not {_0}'s turn")]
    NotYourTurn(PlayerId),

    #[display("{_0} is not in this game")]
    PlayerNotFound(PlayerId),

    #[display("no tiles placed")]
    NoTilesPlaced,

    #[display("placed tiles not of player")]
    TilesNotOwned,

    #[display("rack length mismatch: expected {expected} tiles, found {actual}")]
    RackLengthMismatch { expected: usize, actual: usize },

    #[display("committed tiles were changed")]
    CommittedTilesChanged,

    #[display("invalid board size: {_0} cells")]
    InvalidBoardSize(usize),

    #[display("invalid row: {_0}")]
    InvalidRow(RowError),

    #[display("insufficient first move score: {score} of {required}")]
    InsufficientFirstMoveScore { score: u32, required: u32 },

    #[display("hand does not match placed tiles")]
    HandMismatch,
}

impl std::error::Error for RuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuleError::InvalidRow(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RowError> for RuleError {
    fn from(err: RowError) -> Self {
        RuleError::InvalidRow(err)
    }
}

impl RuleError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuleError::GameNotFound(_)
            | RuleError::AlreadyStarted
            | RuleError::NotEnoughPlayers { .. }
            | RuleError::TooManyPlayers { .. }
            | RuleError::GameFull
            | RuleError::NotStarted
            | RuleError::GameFinished
            | RuleError::NotYourTurn(_)
            | RuleError::PlayerNotFound(_) => ErrorKind::Precondition,
            RuleError::NoTilesPlaced
            | RuleError::TilesNotOwned
            | RuleError::RackLengthMismatch { .. }
            | RuleError::CommittedTilesChanged
            | RuleError::InvalidBoardSize(_)
            | RuleError::InvalidRow(_)
            | RuleError::InsufficientFirstMoveScore { .. }
            | RuleError::HandMismatch => ErrorKind::Legality,
        }
    }

    #[must_use]
    pub fn is_precondition(&self) -> bool {
        self.kind() == ErrorKind::Precondition
    }
}
