//! The acting player's in-progress turn.
//!
//! A [`TurnDraft`] holds a private copy of the board and hand while the
//! player arranges tiles. Tiles moved out of the hand are marked as
//! placed by that player until the draft is proposed with
//! `Rules::commit`. Nothing here is authoritative: a draft can always be
//! thrown away or reset.

pub mod turn;

pub use turn::{DraftError, TurnDraft};
