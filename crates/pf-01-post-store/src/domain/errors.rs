//! # Domain Errors
//!
//! Every store operation reports one of these kinds. `NotFound` and
//! `Conflict` are outcomes a caller can act on; `Backend` is a storage
//! failure that callers surface as an internal error.

use thiserror::Error;

/// Post Store error kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The addressed row or edge does not exist (zero rows affected).
    #[error("not found: {0}")]
    NotFound(String),

    /// The row or edge already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request violates a data-model invariant.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict(what.into())
    }

    pub fn invalid(what: impl Into<String>) -> Self {
        Self::InvalidInput(what.into())
    }

    pub fn backend(what: impl Into<String>) -> Self {
        Self::Backend(what.into())
    }

    /// True for the "zero rows affected" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
