//! Shared error type.
//!
//! Sub-crates define their own error enums for their own failure modes and
//! wrap `CoreError` as one variant where a core operation can fail inside
//! them.

use thiserror::Error;

/// The base error type for `ap-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `ap-core`.
pub type CoreResult<T> = Result<T, CoreError>;
