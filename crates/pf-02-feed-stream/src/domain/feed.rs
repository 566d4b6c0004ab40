//! # Feed Items and Ordering
//!
//! A feed item is a followed post joined with its like set and comment
//! sequence. Ordering is total: `(date, time)` descending, then post id
//! descending, so two posts created in the same minute still have a fixed
//! position.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use pf_01_post_store::FollowedPostRow;
use shared_types::{Comment, PostId, PostTimestamp, UserId};

/// Maximum number of items in one stream response.
pub const FEED_PAGE_LIMIT: usize = 30;

/// Likes and comments resolved for one post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub likes: BTreeSet<UserId>,
    pub comments: Vec<Comment>,
}

/// One entry of a user's stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPost {
    pub post: PostId,
    pub author: UserId,
    pub author_username: String,
    pub created: PostTimestamp,
    pub likes: BTreeSet<UserId>,
    pub comments: Vec<Comment>,
}

impl EnrichedPost {
    pub fn new(row: FollowedPostRow, enrichment: Enrichment) -> Self {
        Self {
            post: row.post,
            author: row.author,
            author_username: row.author_username,
            created: row.created,
            likes: enrichment.likes,
            comments: enrichment.comments,
        }
    }
}

/// Newest first; equal timestamps fall back to the higher post id.
pub fn recency_order(a: &EnrichedPost, b: &EnrichedPost) -> Ordering {
    (b.created, b.post).cmp(&(a.created, a.post))
}

/// Sort by [`recency_order`] and keep the first `limit` items.
///
/// The whole candidate set is materialized before truncation, so the result
/// is the most recent `limit` posts across all authors.
pub fn select_most_recent(mut items: Vec<EnrichedPost>, limit: usize) -> Vec<EnrichedPost> {
    items.sort_unstable_by(recency_order);
    items.truncate(limit);
    items
}

/// True if every adjacent pair is in [`recency_order`].
pub fn is_recency_ordered(items: &[EnrichedPost]) -> bool {
    items
        .windows(2)
        .all(|pair| recency_order(&pair[0], &pair[1]) != Ordering::Greater)
}
