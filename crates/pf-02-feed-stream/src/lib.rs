//! # Feed Stream Subsystem (pf-02)
//!
//! Assembles the stream a user sees: every post authored by the users they
//! follow, enriched with likes and comments, newest first, capped at
//! [`FEED_PAGE_LIMIT`] items.
//!
//! ## Pipeline
//!
//! ```text
//! followed_posts(user) ──→ enrich (likes ∥ comments, per post, concurrent)
//!                                   │
//!                                   ▼
//!                    join by PostId ──→ sort ──→ truncate(30)
//! ```
//!
//! ## Guarantees
//!
//! | Property | Enforced by |
//! |----------|-------------|
//! | Only followed authors appear | `PostStore::followed_posts` |
//! | Date desc, time desc, post id desc | `domain::recency_order` |
//! | At most 30 items, the most recent across all authors | `domain::select_most_recent` |
//! | No partial feed on enrichment failure | `service::EnrichmentResolver` |
//!
//! The stream is re-derived from the store on every call. Nothing is cached.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    select_most_recent, EnrichedPost, Enrichment, StreamConfig, StreamError, StreamResult,
    FEED_PAGE_LIMIT,
};
pub use ports::FeedStreamApi;
pub use service::{EnrichmentResolver, StreamAssembler};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
