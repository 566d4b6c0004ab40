//! # Error Types
//!
//! Errors raised while constructing shared values.

use thiserror::Error;

/// A textual identity could not be parsed as an unsigned 64-bit integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityParseError {
    /// The input was empty.
    #[error("identity is empty")]
    Empty,

    /// The input was not a base-10 unsigned integer.
    #[error("identity is not an unsigned integer: {0}")]
    NotUnsigned(String),
}
