//! In-memory Post Store.
//!
//! All state sits behind one `parking_lot::RwLock`: reads share the lock,
//! writes take it exclusively. Used by tests and by the `memory` backend.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Comment, CommentId, Like, Post, PostId, PostTimestamp, User, UserId};
use tracing::debug;

use crate::domain::{FollowedPostRow, StoreError, StoreResult, UserProfile};
use crate::ports::inbound::{
    ensure_distinct, follow_edge, normalize_username, AccountStore, PostStore, PostStoreWriter,
};

#[derive(Debug, Clone)]
struct StoredComment {
    author: UserId,
    body: String,
}

#[derive(Debug, Default)]
struct StoreState {
    users: BTreeMap<UserId, User>,
    usernames: HashMap<String, UserId>,
    posts: BTreeMap<PostId, Post>,
    likes: BTreeSet<Like>,
    /// Keyed by post first so one post's comments are a contiguous range.
    comments: BTreeMap<(PostId, CommentId), StoredComment>,
    last_user_id: u64,
    last_comment_id: u64,
}

impl StoreState {
    fn user(&self, id: UserId) -> StoreResult<&User> {
        self.users
            .get(&id)
            .ok_or_else(|| StoreError::not_found(format!("user {}", id)))
    }

    fn user_mut(&mut self, id: UserId) -> StoreResult<&mut User> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(format!("user {}", id)))
    }

    fn ensure_post(&self, id: PostId) -> StoreResult<()> {
        if self.posts.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::not_found(format!("post {}", id)))
        }
    }

    fn username_of(&self, id: UserId) -> String {
        self.users
            .get(&id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn usernames_of<'a>(&self, ids: impl Iterator<Item = &'a UserId>) -> Vec<String> {
        ids.map(|id| self.username_of(*id)).collect()
    }

    fn next_post_id(&self) -> PostId {
        self.posts
            .keys()
            .next_back()
            .map(|id| id.next())
            .unwrap_or(PostId::FIRST)
    }
}

/// In-memory store backed by ordered maps.
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    state: RwLock<StoreState>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored posts.
    pub fn post_count(&self) -> usize {
        self.state.read().posts.len()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn followed_posts(&self, user: UserId) -> StoreResult<Vec<FollowedPostRow>> {
        let state = self.state.read();
        let following = match state.users.get(&user) {
            Some(u) => &u.following,
            None => return Ok(Vec::new()),
        };

        let rows: Vec<FollowedPostRow> = state
            .posts
            .values()
            .filter(|post| following.contains(&post.owner))
            .map(|post| FollowedPostRow {
                post: post.id,
                author: post.owner,
                author_username: state.username_of(post.owner),
                created: post.created,
            })
            .collect();

        debug!(user_id = %user, posts = rows.len(), "Resolved followed posts");
        Ok(rows)
    }

    async fn likes_for(&self, post: PostId) -> StoreResult<BTreeSet<UserId>> {
        let state = self.state.read();
        let from = Like::new(post, UserId(u64::MIN));
        let to = Like::new(post, UserId(u64::MAX));
        Ok(state.likes.range(from..=to).map(|like| like.user).collect())
    }

    async fn comments_for(&self, post: PostId) -> StoreResult<Vec<Comment>> {
        let state = self.state.read();
        let from = (post, CommentId(u64::MIN));
        let to = (post, CommentId(u64::MAX));
        Ok(state
            .comments
            .range(from..=to)
            .map(|((post, id), c)| Comment {
                id: *id,
                post: *post,
                author: c.author,
                author_username: state.username_of(c.author),
                body: c.body.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl AccountStore for InMemoryPostStore {
    async fn find_user_id(&self, username: &str) -> StoreResult<Option<UserId>> {
        Ok(self.state.read().usernames.get(username).copied())
    }

    async fn create_user(&self, username: &str) -> StoreResult<UserId> {
        let username = normalize_username(username)?;
        let mut state = self.state.write();
        if state.usernames.contains_key(username) {
            return Err(StoreError::conflict(format!("username {}", username)));
        }

        state.last_user_id += 1;
        let id = UserId(state.last_user_id);
        state.users.insert(id, User::new(id, username));
        state.usernames.insert(username.to_string(), id);
        Ok(id)
    }

    async fn user_profile(&self, user: UserId) -> StoreResult<UserProfile> {
        let state = self.state.read();
        let record = state.user(user)?;

        let mut owned: Vec<&Post> = state.posts.values().filter(|p| p.owner == user).collect();
        owned.sort_by(|a, b| (b.created, b.id).cmp(&(a.created, a.id)));

        Ok(UserProfile {
            id: record.id,
            username: record.username.clone(),
            posts: owned.into_iter().map(|p| p.id).collect(),
            followers: state.usernames_of(record.followers.iter()),
            following: state.usernames_of(record.following.iter()),
            banned: state.usernames_of(record.banned.iter()),
        })
    }
}

#[async_trait]
impl PostStoreWriter for InMemoryPostStore {
    async fn follow(&self, follower: UserId, followed: UserId) -> StoreResult<()> {
        let edge = follow_edge(follower, followed)?;
        let mut state = self.state.write();
        state.user(edge.followed)?;

        if !state.user_mut(edge.follower)?.following.insert(edge.followed) {
            return Err(StoreError::conflict(format!(
                "user {} already follows {}",
                edge.follower, edge.followed
            )));
        }
        state.user_mut(edge.followed)?.followers.insert(edge.follower);
        Ok(())
    }

    async fn unfollow(&self, follower: UserId, followed: UserId) -> StoreResult<()> {
        let mut state = self.state.write();
        if !state.user_mut(follower)?.following.remove(&followed) {
            return Err(StoreError::not_found(format!(
                "follow edge {} -> {}",
                follower, followed
            )));
        }
        state.user_mut(followed)?.followers.remove(&follower);
        Ok(())
    }

    async fn ban(&self, user: UserId, banned: UserId) -> StoreResult<()> {
        ensure_distinct(user, banned, "ban")?;
        let mut state = self.state.write();
        state.user(banned)?;

        if !state.user_mut(user)?.banned.insert(banned) {
            return Err(StoreError::conflict(format!(
                "user {} already banned {}",
                user, banned
            )));
        }
        Ok(())
    }

    async fn create_post(&self, owner: UserId, created: PostTimestamp) -> StoreResult<PostId> {
        let mut state = self.state.write();
        state.user(owner)?;

        let id = state.next_post_id();
        state.posts.insert(id, Post { id, owner, created });
        debug!(post_id = %id, user_id = %owner, "Created post");
        Ok(id)
    }

    async fn like(&self, post: PostId, user: UserId) -> StoreResult<()> {
        let mut state = self.state.write();
        state.ensure_post(post)?;
        state.user(user)?;

        if !state.likes.insert(Like::new(post, user)) {
            return Err(StoreError::conflict(format!(
                "like (post {}, user {})",
                post, user
            )));
        }
        Ok(())
    }

    async fn delete_like(&self, post: PostId, user: UserId) -> StoreResult<()> {
        if !self.state.write().likes.remove(&Like::new(post, user)) {
            return Err(StoreError::not_found(format!(
                "like (post {}, user {})",
                post, user
            )));
        }
        Ok(())
    }

    async fn comment(&self, post: PostId, user: UserId, body: &str) -> StoreResult<CommentId> {
        let body = body.trim();
        if body.is_empty() {
            return Err(StoreError::invalid("comment body is empty"));
        }

        let mut state = self.state.write();
        state.ensure_post(post)?;
        state.user(user)?;

        state.last_comment_id += 1;
        let id = CommentId(state.last_comment_id);
        state.comments.insert(
            (post, id),
            StoredComment {
                author: user,
                body: body.to_string(),
            },
        );
        Ok(id)
    }

    async fn next_post_id(&self) -> StoreResult<PostId> {
        Ok(self.state.read().next_post_id())
    }
}
