//! Game rules.
//!
//! - `row`: run and group validation for one logical row
//! - `score`: opening threshold scoring and final standings
//! - `error`: rejection reasons
//! - `engine`: `Rules`, the pure snapshot-to-snapshot transitions
//!
//! Nothing in this module performs I/O. Callers load a snapshot, ask
//! `Rules` for the next one and decide how to persist it.

pub mod engine;
pub mod error;
pub mod row;
pub mod score;

pub use engine::{hand_after, Rules};
pub use error::{ErrorKind, RowError, RuleError};
pub use row::{validate_board, validate_row, RowKind, MIN_ROW_LEN};
pub use score::{placement_score, standings, Standing};
