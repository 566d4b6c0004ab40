//! # Domain Layer
//!
//! Error taxonomy and read-side records of the Post Store.
//!
//! This module contains NO I/O dependencies.

pub mod errors;
pub mod records;

pub use errors::*;
pub use records::*;
