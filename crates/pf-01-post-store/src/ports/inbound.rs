//! # Inbound Ports
//!
//! Store APIs implemented by every backend in `adapters/`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use shared_types::{Comment, CommentId, FollowEdge, PostId, PostTimestamp, UserId};
use tracing::debug;

use crate::domain::{FollowedPostRow, StoreError, StoreResult, UserProfile};

/// Read path consumed by the feed stream.
///
/// All three operations are safe to call concurrently for different posts.
/// "No rows" is an empty container, never an error.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Every post authored by a user that `user` follows, unordered and
    /// unpaginated. Reflects the follow graph at call time.
    async fn followed_posts(&self, user: UserId) -> StoreResult<Vec<FollowedPostRow>>;

    /// Identities of the users who liked `post`.
    async fn likes_for(&self, post: PostId) -> StoreResult<BTreeSet<UserId>>;

    /// Comments on `post` in insertion order, author usernames resolved.
    async fn comments_for(&self, post: PostId) -> StoreResult<Vec<Comment>>;
}

/// User provisioning and profile reads.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up a user by exact username.
    async fn find_user_id(&self, username: &str) -> StoreResult<Option<UserId>>;

    /// Create a user. Fails with `Conflict` if the username is taken.
    async fn create_user(&self, username: &str) -> StoreResult<UserId>;

    /// Profile of `user`, or `NotFound`.
    async fn user_profile(&self, user: UserId) -> StoreResult<UserProfile>;

    /// Return the identity for `username`, provisioning it on first use.
    ///
    /// A concurrent login that wins the insert race is resolved by
    /// re-reading the row.
    async fn login(&self, username: &str) -> StoreResult<UserId> {
        let username = normalize_username(username)?;

        if let Some(id) = self.find_user_id(username).await? {
            return Ok(id);
        }

        match self.create_user(username).await {
            Ok(id) => {
                debug!(user_id = %id, "Provisioned new user");
                Ok(id)
            }
            Err(StoreError::Conflict(_)) => self
                .find_user_id(username)
                .await?
                .ok_or_else(|| StoreError::backend("user vanished after conflicting insert")),
            Err(e) => Err(e),
        }
    }
}

/// Write path. Not used by the feed read path.
#[async_trait]
pub trait PostStoreWriter: Send + Sync {
    /// Add the edge `follower -> followed`.
    async fn follow(&self, follower: UserId, followed: UserId) -> StoreResult<()>;

    /// Remove the edge `follower -> followed`; `NotFound` if absent.
    async fn unfollow(&self, follower: UserId, followed: UserId) -> StoreResult<()>;

    /// Add `banned` to `user`'s banned set.
    async fn ban(&self, user: UserId, banned: UserId) -> StoreResult<()>;

    /// Create a post owned by `owner`; the id is assigned by the store.
    async fn create_post(&self, owner: UserId, created: PostTimestamp) -> StoreResult<PostId>;

    /// Like `post` as `user`; `Conflict` on a duplicate.
    async fn like(&self, post: PostId, user: UserId) -> StoreResult<()>;

    /// Remove the like; `NotFound` when zero rows were affected.
    async fn delete_like(&self, post: PostId, user: UserId) -> StoreResult<()>;

    /// Comment on `post` as `user`.
    async fn comment(&self, post: PostId, user: UserId, body: &str) -> StoreResult<CommentId>;

    /// `max(post id) + 1`, or `PostId::FIRST` when no posts exist.
    ///
    /// Advisory: only `create_post` assigns ids atomically.
    async fn next_post_id(&self) -> StoreResult<PostId>;
}

/// Everything a full backend provides.
pub trait SocialStore: PostStore + AccountStore + PostStoreWriter {}

impl<T> SocialStore for T where T: PostStore + AccountStore + PostStoreWriter {}

/// Trim a username and reject empty input.
pub fn normalize_username(raw: &str) -> StoreResult<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StoreError::invalid("username is empty"));
    }
    Ok(trimmed)
}

/// Validated follow edge; self-follows are rejected.
pub(crate) fn follow_edge(follower: UserId, followed: UserId) -> StoreResult<FollowEdge> {
    let edge = FollowEdge::new(follower, followed);
    if edge.is_self_edge() {
        return Err(StoreError::invalid(format!(
            "user {} cannot follow itself",
            follower
        )));
    }
    Ok(edge)
}

/// Reject self-edges (a user never appears in its own relation sets).
pub(crate) fn ensure_distinct(a: UserId, b: UserId, relation: &str) -> StoreResult<()> {
    if a == b {
        return Err(StoreError::invalid(format!(
            "user {} cannot {} itself",
            a, relation
        )));
    }
    Ok(())
}
