//! # Stream Assembler Service
//!
//! ## Architecture
//!
//! For one request the assembler:
//! 1. Lists every post authored by a followed user (no date filter, no
//!    pre-pagination)
//! 2. Enriches all of them through the `EnrichmentResolver`
//! 3. Joins enrichments back by post id, sorts newest first and truncates
//!    to `FEED_PAGE_LIMIT`
//!
//! Any store failure in steps 1 or 2 fails the call. No retries.

mod enrichment;

pub use enrichment::EnrichmentResolver;

use std::sync::Arc;

use async_trait::async_trait;
use pf_01_post_store::PostStore;
use shared_types::{PostId, UserId};
use tracing::{debug, instrument};

use crate::domain::{
    select_most_recent, EnrichedPost, StreamConfig, StreamError, StreamResult, FEED_PAGE_LIMIT,
};
use crate::ports::FeedStreamApi;

/// Builds user streams from a `PostStore`.
pub struct StreamAssembler<S: PostStore + ?Sized> {
    store: Arc<S>,
    resolver: EnrichmentResolver<S>,
}

impl<S: PostStore + ?Sized> StreamAssembler<S> {
    pub fn new(store: Arc<S>, config: &StreamConfig) -> Self {
        let resolver = EnrichmentResolver::new(Arc::clone(&store), config.enrichment_concurrency);
        Self { store, resolver }
    }
}

#[async_trait]
impl<S: PostStore + ?Sized> FeedStreamApi for StreamAssembler<S> {
    #[instrument(skip_all, fields(user_id = %user))]
    async fn user_stream(&self, user: UserId) -> StreamResult<Vec<EnrichedPost>> {
        let rows = self.store.followed_posts(user).await?;
        if rows.is_empty() {
            debug!("No followed posts");
            return Ok(Vec::new());
        }

        let candidates = rows.len();
        let ids: Vec<PostId> = rows.iter().map(|r| r.post).collect();
        let mut enrichments = self.resolver.resolve_all(ids).await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let enrichment = enrichments
                    .remove(&row.post)
                    .ok_or(StreamError::MissingEnrichment(row.post))?;
                Ok(EnrichedPost::new(row, enrichment))
            })
            .collect::<StreamResult<Vec<_>>>()?;

        let page = select_most_recent(items, FEED_PAGE_LIMIT);
        debug!(candidates, returned = page.len(), "Assembled stream");
        Ok(page)
    }
}
