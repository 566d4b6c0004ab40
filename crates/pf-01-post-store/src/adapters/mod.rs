//! # Adapters Layer
//!
//! Backends implementing the store ports.
//!
//! - `memory`: lock-guarded maps, used by tests and the `memory` backend
//! - `sqlite`: persistent rusqlite backend (feature `sqlite`)

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryPostStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqlitePostStore;
