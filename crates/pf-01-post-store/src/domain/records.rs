//! # Read Records
//!
//! Rows returned by the read path. These are join results, not entities.

use shared_types::{PostId, PostTimestamp, UserId};

/// One row of the followed-posts join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowedPostRow {
    pub post: PostId,
    pub author: UserId,
    pub author_username: String,
    pub created: PostTimestamp,
}

/// A user's profile with relation sets resolved to usernames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    /// Post ids, newest first.
    pub posts: Vec<PostId>,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub banned: Vec<String>,
}

impl UserProfile {
    /// Derived post count.
    pub fn post_count(&self) -> usize {
        self.posts.len()
    }
}
