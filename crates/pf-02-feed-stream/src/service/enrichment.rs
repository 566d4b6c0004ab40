//! # Enrichment Resolver
//!
//! Fetches the like set and comment sequence of each post. Posts are
//! independent, so they are enriched concurrently up to a configured bound;
//! within one post both reads run together. The first failure drops every
//! in-flight read and is returned as is.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use pf_01_post_store::PostStore;
use shared_types::PostId;
use tracing::warn;

use crate::domain::{Enrichment, StreamResult};

/// Resolves likes and comments for posts.
pub struct EnrichmentResolver<S: PostStore + ?Sized> {
    store: Arc<S>,
    concurrency: usize,
}

impl<S: PostStore + ?Sized> EnrichmentResolver<S> {
    /// `concurrency` is clamped to at least 1.
    pub fn new(store: Arc<S>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Likes and comments of a single post.
    pub async fn resolve(&self, post: PostId) -> StreamResult<Enrichment> {
        let (likes, comments) =
            tokio::try_join!(self.store.likes_for(post), self.store.comments_for(post))
                .inspect_err(|e| warn!(post_id = %post, error = %e, "Enrichment read failed"))?;

        Ok(Enrichment { likes, comments })
    }

    /// Enrich every post, keyed by post id. All or nothing.
    pub async fn resolve_all<I>(&self, posts: I) -> StreamResult<HashMap<PostId, Enrichment>>
    where
        I: IntoIterator<Item = PostId>,
    {
        stream::iter(posts)
            .map(|post| async move { self.resolve(post).await.map(|e| (post, e)) })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await
    }
}
