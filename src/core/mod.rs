//! Core types: tiles, players, ids, RNG, configuration and the game snapshot.
//!
//! Nothing here enforces rules. `rules` reads and produces these values.

pub mod config;
pub mod ids;
pub mod player;
pub mod rng;
pub mod state;
pub mod tile;

pub use config::{LayoutConfig, RulesConfig};
pub use ids::{GameId, RandomTileIds, SequentialTileIds, TileIdSource};
pub use player::{sort_tiles, HandOrder, Player, PlayerId};
pub use rng::GameRng;
pub use state::{Game, GamePhase};
pub use tile::{
    full_tile_set, Color, GameTile, InvalidTileValue, RackTile, Tile, TileId, TileValue,
    COPIES_PER_TILE, JOKER_SENTINEL, TILES_PER_COLOR,
};
