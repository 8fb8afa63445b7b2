//! Error types for ingestion and data-source access.

use thiserror::Error;

use ap_spatial::SpatialError;

/// Why a single upstream record was skipped.  Never fatal to a batch.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record is not a valid activity object: {0}")]
    Malformed(String),

    #[error("record has no path")]
    MissingPath,

    #[error("path is not a waypoint array: {0}")]
    UnparsablePath(String),

    #[error("path has {count} waypoint(s) before filtering; need at least 2")]
    TooFewWaypoints { count: usize },

    #[error("only {valid} of {total} waypoints are valid; need at least 2")]
    TooFewValidWaypoints { valid: usize, total: usize },

    #[error("record has neither citizenId nor citizen")]
    MissingAgentId,

    #[error("geometry error: {0}")]
    Geometry(#[from] SpatialError),
}

/// Failure of the upstream data source as a whole.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream reported failure: {0}")]
    Upstream(String),

    #[error("response is not an activity list: {0}")]
    Decode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;
