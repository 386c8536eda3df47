//! Scoring: the opening threshold and final standings.

use serde::{Deserialize, Serialize};

use crate::core::{Game, PlayerId, Tile};

/// Sum of `tiles` at face value, jokers at `joker_score`.
pub fn placement_score<'a>(tiles: impl IntoIterator<Item = &'a Tile>, joker_score: u32) -> u32 {
    tiles.into_iter().map(|t| t.score(joker_score)).sum()
}

/// One line of the final table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub name: String,
    /// Points left in hand. Lower is better.
    pub remaining: u32,
    pub is_winner: bool,
}

/// Players ranked by points left in hand, winner first.
///
/// Ties keep seating order.
#[must_use]
pub fn standings(game: &Game, joker_score: u32) -> Vec<Standing> {
    let mut table: Vec<Standing> = game
        .players
        .iter()
        .map(|p| Standing {
            player_id: p.id,
            name: p.name.clone(),
            remaining: p.hand_score(joker_score),
            is_winner: game.winner_id == Some(p.id),
        })
        .collect();

    table.sort_by_key(|s| (!s.is_winner, s.remaining));
    table
}
