//! Stream assembly configuration.

use serde::{Deserialize, Serialize};

/// Tuning for the stream assembler. The page size is fixed by
/// [`FEED_PAGE_LIMIT`](super::FEED_PAGE_LIMIT) and is not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Maximum number of posts enriched concurrently for one request.
    pub enrichment_concurrency: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            enrichment_concurrency: 16,
        }
    }
}

impl StreamConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.enrichment_concurrency == 0 {
            return Err("enrichment_concurrency cannot be 0".into());
        }
        Ok(())
    }
}
