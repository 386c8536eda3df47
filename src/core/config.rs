//! Rules and layout configuration.
//!
//! - `LayoutConfig`: starting grid and how it grows
//! - `RulesConfig`: player limits, deal size, opening threshold, joker score
//!
//! Defaults match the standard game. Builders validate values that would
//! leave the engine unable to run.

use serde::{Deserialize, Serialize};

/// Board grid geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Columns of the starting grid.
    pub initial_columns: usize,
    /// Rows of the starting grid.
    pub initial_rows: usize,
    /// Columns added per growth step.
    pub column_step: usize,
    /// Rows added per growth step.
    pub row_step: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            initial_columns: 12,
            initial_rows: 4,
            column_step: 3,
            row_step: 1,
        }
    }
}

impl LayoutConfig {
    /// Create a layout. Panics on a degenerate grid.
    #[must_use]
    pub fn new(initial_columns: usize, initial_rows: usize) -> Self {
        assert!(initial_columns > 0, "Grid must have at least 1 column");
        assert!(initial_rows > 0, "Grid must have at least 1 row");

        Self {
            initial_columns,
            initial_rows,
            ..Self::default()
        }
    }

    /// Set the growth increments. At least one must be non-zero.
    #[must_use]
    pub fn with_growth(mut self, column_step: usize, row_step: usize) -> Self {
        assert!(
            column_step > 0 || row_step > 0,
            "Grid growth must add columns or rows"
        );
        self.column_step = column_step;
        self.row_step = row_step;
        self
    }

    /// Cell count of the starting grid.
    #[must_use]
    pub fn initial_len(&self) -> usize {
        self.initial_columns * self.initial_rows
    }
}

/// Game rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Players needed to start.
    pub min_players: usize,
    /// Seats available.
    pub max_players: usize,
    /// Tiles dealt to each player on start.
    pub tiles_per_player: usize,
    /// Score the opening placement must reach.
    pub first_move_score: u32,
    /// What a joker counts for when scoring.
    pub joker_score: u32,
    /// Board grid geometry.
    pub layout: LayoutConfig,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 4,
            tiles_per_player: 14,
            first_move_score: 30,
            joker_score: 25,
            layout: LayoutConfig::default(),
        }
    }
}

impl RulesConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the seat limits.
    #[must_use]
    pub fn with_players(mut self, min: usize, max: usize) -> Self {
        assert!(min > 0, "Must need at least 1 player");
        assert!(min <= max, "Minimum players cannot exceed maximum");
        self.min_players = min;
        self.max_players = max;
        self
    }

    #[must_use]
    pub fn with_tiles_per_player(mut self, tiles: usize) -> Self {
        self.tiles_per_player = tiles;
        self
    }

    #[must_use]
    pub fn with_first_move_score(mut self, score: u32) -> Self {
        self.first_move_score = score;
        self
    }

    #[must_use]
    pub fn with_joker_score(mut self, score: u32) -> Self {
        self.joker_score = score;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }
}
