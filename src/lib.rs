//! # rust-rummy
//!
//! Rules and turn-state engine for multiplayer tile rummy.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: `Rules` maps one `Game` snapshot to the next
//!    or rejects with a reason. Validation never mutates its input.
//!
//! 2. **Flat Board**: The shared board is a fixed-stride grid of cells.
//!    Logical rows are derived from it, never stored.
//!
//! 3. **Single Authority**: Writes go through a versioned store with
//!    compare-and-swap, so concurrent turns cannot both land.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) snapshot cloning via `im-rs`.
//!
//! - **Deterministic Randomness**: Seeded ChaCha8 for shuffles and draws,
//!   so whole games replay from a seed.
//!
//! ## Modules
//!
//! - `core`: Tiles, players, ids, RNG, configuration, the game snapshot
//! - `board`: Grid dimensions, row segmentation, compactness and growth
//! - `rules`: Row validation, scoring, and the turn engine
//! - `draft`: The acting player's in-progress turn
//! - `service`: Store, notifications, and the operation loop
//!
//! ## Example
//!
//! ```
//! use rust_rummy::core::{GameId, GameRng, Player, PlayerId, SequentialTileIds};
//! use rust_rummy::rules::Rules;
//!
//! let rules = Rules::default();
//! let game = rules.create(GameId::new(1), Player::new(PlayerId::new(1), "ann"));
//! let game = rules.join(&game, Player::new(PlayerId::new(2), "bob")).unwrap();
//! let game = rules
//!     .start(&game, &mut GameRng::new(42), &mut SequentialTileIds::default())
//!     .unwrap();
//!
//! assert!(game.players.iter().all(|p| p.hand_size() == 14));
//! ```

pub mod board;
pub mod core;
pub mod draft;
pub mod rules;
pub mod service;

// Re-export commonly used types
pub use crate::core::{
    Color, Game, GameId, GamePhase, GameRng, GameTile, HandOrder, LayoutConfig,
    Player, PlayerId, RackTile, RulesConfig, Tile, TileId, TileIdSource, TileValue,
};

pub use crate::board::{FlatBoard, GridDimensions, PlacementError};

pub use crate::rules::{ErrorKind, RowError, RowKind, RuleError, Rules, Standing};

pub use crate::draft::{DraftError, TurnDraft};

pub use crate::service::{
    Broadcaster, ChangeNotifier, GameService, GameStore, MemoryStore, NullNotifier, ServiceError,
    StoreError, Versioned,
};
