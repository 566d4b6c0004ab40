//! # Domain Layer
//!
//! Feed items, ordering rules, configuration and errors.
//!
//! This module contains NO I/O dependencies.

pub mod config;
pub mod errors;
pub mod feed;

pub use config::*;
pub use errors::*;
pub use feed::*;
