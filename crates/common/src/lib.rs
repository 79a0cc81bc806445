//! Shared types and error definitions for the expiry predictor.

pub mod error;
pub mod types;

pub use error::{Error, ValidationError};
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
