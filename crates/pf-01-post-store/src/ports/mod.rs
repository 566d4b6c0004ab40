//! # Ports Layer
//!
//! Interfaces the Post Store exposes to the feed stream and the gateway.
//!
//! - **Read path**: `PostStore` (consumed by the feed stream)
//! - **Accounts**: `AccountStore` (login, profile)
//! - **Write path**: `PostStoreWriter` (edges, posts, likes, comments)

pub mod inbound;

pub use inbound::*;
