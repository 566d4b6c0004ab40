//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `UserId`, `PostId`, `CommentId`
//! - **Accounts**: `User`, `FollowEdge`
//! - **Content**: `Post`, `PostTimestamp`, `Like`, `Comment`

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::IdentityParseError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Parse a base-10 unsigned 64-bit identity.
///
/// Only ASCII digits are accepted (no sign, no whitespace).
pub fn parse_identity(raw: &str) -> Result<u64, IdentityParseError> {
    if raw.is_empty() {
        return Err(IdentityParseError::Empty);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IdentityParseError::NotUnsigned(raw.to_string()));
    }
    raw.parse::<u64>()
        .map_err(|_| IdentityParseError::NotUnsigned(raw.to_string()))
}

macro_rules! numeric_identity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentityParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_identity(s).map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

numeric_identity!(
    /// Opaque unique identity of a user. Doubles as the bearer token payload.
    UserId
);

numeric_identity!(
    /// Unique post identity, monotonically increasing across the system.
    PostId
);

numeric_identity!(
    /// Unique comment identity.
    CommentId
);

impl PostId {
    /// The first id handed out on an empty store.
    pub const FIRST: PostId = PostId(1);

    /// The id that follows this one.
    pub fn next(self) -> PostId {
        PostId(self.0 + 1)
    }
}

// =============================================================================
// CLUSTER B: ACCOUNTS
// =============================================================================

/// A registered user and its relation sets.
///
/// A user's own identity never appears in its own relation sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub followers: BTreeSet<UserId>,
    pub following: BTreeSet<UserId>,
    pub banned: BTreeSet<UserId>,
}

impl User {
    /// A fresh user with empty relation sets.
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            followers: BTreeSet::new(),
            following: BTreeSet::new(),
            banned: BTreeSet::new(),
        }
    }
}

/// Directed follow relation: `follower`'s stream includes `followed`'s posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FollowEdge {
    pub follower: UserId,
    pub followed: UserId,
}

impl FollowEdge {
    pub fn new(follower: UserId, followed: UserId) -> Self {
        Self { follower, followed }
    }

    /// Self-edges are never valid.
    pub fn is_self_edge(&self) -> bool {
        self.follower == self.followed
    }
}

// =============================================================================
// CLUSTER C: CONTENT
// =============================================================================

/// Creation date and time of a post, kept as separate components.
///
/// Field order gives the derived `Ord` (date first, then time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostTimestamp {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl PostTimestamp {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Parse `YYYY-MM-DD` and `HH:MM[:SS]` components.
    pub fn parse(date: &str, time: &str) -> Option<Self> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .ok()?;
        Some(Self { date, time })
    }

    /// Date rendered as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Time rendered as `HH:MM:SS`.
    pub fn time_string(&self) -> String {
        self.time.format("%H:%M:%S").to_string()
    }
}

/// A photo post owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub owner: UserId,
    pub created: PostTimestamp,
}

/// A like edge. At most one per (post, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Like {
    pub post: PostId,
    pub user: UserId,
}

impl Like {
    pub fn new(post: PostId, user: UserId) -> Self {
        Self { post, user }
    }
}

/// A comment on a post, with the author's username resolved at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post: PostId,
    pub author: UserId,
    pub author_username: String,
    pub body: String,
}
