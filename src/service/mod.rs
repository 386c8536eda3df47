//! Persistence and fan-out around the rules.
//!
//! - `store`: versioned snapshots with compare-and-swap writes
//! - `notify`: change notification to observers
//! - `games`: `GameService`, the load/transition/write/notify loop

pub mod games;
pub mod notify;
pub mod store;

pub use games::{GameService, ServiceError};
pub use notify::{Broadcaster, ChangeNotifier, NullNotifier};
pub use store::{GameStore, MemoryStore, StoreError, Versioned};
