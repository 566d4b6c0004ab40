//! # Domain Errors

use pf_01_post_store::StoreError;
use shared_types::PostId;
use thiserror::Error;

/// Stream assembly failures. Every variant aborts the whole call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A store read failed while listing or enriching posts.
    #[error("post store failure: {0}")]
    Store(#[from] StoreError),

    /// A listed post has no resolved enrichment.
    #[error("enrichment missing for post {0}")]
    MissingEnrichment(PostId),
}

/// Result alias for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;
