//! # Post Store Subsystem (pf-01)
//!
//! The Post Store owns persisted users, posts, likes, comments and follow
//! edges, and exposes relation-scoped read and write operations to the
//! other subsystems.
//!
//! ## Responsibilities
//!
//! - Resolve the posts authored by everyone a user follows
//! - Resolve the like set and comment sequence of a single post
//! - Provision users lazily on login
//! - Delete likes with a distinguishable `NotFound` outcome
//! - Hand out monotonically increasing post ids
//!
//! ## Read Path Contract
//!
//! | Operation | Empty result | Concurrency |
//! |-----------|--------------|-------------|
//! | `followed_posts` | empty `Vec` (follows nobody) | shared read |
//! | `likes_for` | empty set | shared read |
//! | `comments_for` | empty `Vec` | shared read |
//!
//! Reads never take an exclusive lock and never cache follow edges.
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): error taxonomy and read records
//! - **Ports Layer** (`ports/`): `PostStore`, `AccountStore`, `PostStoreWriter`
//! - **Adapters Layer** (`adapters/`): in-memory and SQLite backends

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::InMemoryPostStore;
#[cfg(feature = "sqlite")]
pub use adapters::SqlitePostStore;
pub use domain::{FollowedPostRow, StoreError, StoreResult, UserProfile};
pub use ports::{AccountStore, PostStore, PostStoreWriter, SocialStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
