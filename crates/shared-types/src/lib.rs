//! # Shared Types Crate
//!
//! Identities and entities used across the Photo-Feed subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: users, posts, likes, comments and follow
//!   edges are defined once here and consumed by the store, the feed
//!   stream and the gateway.
//! - **Typed Identities**: every numeric id is a newtype so a `PostId` can
//!   never be passed where a `UserId` is expected.
//! - **No I/O**: this crate holds plain data only.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
