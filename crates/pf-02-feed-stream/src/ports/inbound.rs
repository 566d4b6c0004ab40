//! Inbound API of the feed stream.

use async_trait::async_trait;
use shared_types::UserId;

use crate::domain::{EnrichedPost, StreamResult};

/// Stream reads offered to the boundary.
#[async_trait]
pub trait FeedStreamApi: Send + Sync {
    /// The enriched stream of `user`, newest first, at most
    /// [`FEED_PAGE_LIMIT`](crate::FEED_PAGE_LIMIT) items.
    ///
    /// The caller must already have authorized `user`. An empty stream is
    /// `Ok(vec![])`.
    async fn user_stream(&self, user: UserId) -> StreamResult<Vec<EnrichedPost>>;
}
