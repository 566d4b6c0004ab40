//! # Ports Layer
//!
//! - **Inbound**: `FeedStreamApi` (consumed by the gateway)
//! - **Outbound**: the Post Store read path, `pf_01_post_store::PostStore`

pub mod inbound;

pub use inbound::*;
