//! Wire types for the HTTP surface. Field names are camelCase on the wire.

use pf_01_post_store::UserProfile;
use pf_02_feed_stream::EnrichedPost;
use serde::{Deserialize, Serialize};
use shared_types::{Comment, CommentId, PostId, UserId};

/// `POST /session` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// `POST /session` response; `id` doubles as the bearer token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: UserId,
}

/// One comment inside a stream item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostComment {
    pub username: String,
    pub user_id: UserId,
    pub comment: String,
    pub comment_id: CommentId,
}

impl From<Comment> for PostComment {
    fn from(c: Comment) -> Self {
        Self {
            username: c.author_username,
            user_id: c.author,
            comment: c.body,
            comment_id: c.id,
        }
    }
}

/// One stream item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPost {
    pub user_id: UserId,
    pub username: String,
    pub photo_id: PostId,
    pub date: String,
    pub time: String,
    pub likes: Vec<UserId>,
    pub comments: Vec<PostComment>,
}

impl From<EnrichedPost> for UserPost {
    fn from(p: EnrichedPost) -> Self {
        Self {
            user_id: p.author,
            username: p.author_username,
            photo_id: p.post,
            date: p.created.date_string(),
            time: p.created.time_string(),
            likes: p.likes.into_iter().collect(),
            comments: p.comments.into_iter().map(PostComment::from).collect(),
        }
    }
}

/// `GET /users/{userID}` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: UserId,
    pub username: String,
    pub posts: Vec<PostId>,
    pub number_of_photos: usize,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub banned: Vec<String>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(p: UserProfile) -> Self {
        Self {
            number_of_photos: p.post_count(),
            id: p.id,
            username: p.username,
            posts: p.posts,
            followers: p.followers,
            following: p.following,
            banned: p.banned,
        }
    }
}

/// `GET /health` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
