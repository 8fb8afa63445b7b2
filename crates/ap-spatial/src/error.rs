//! Spatial-subsystem error type.

use thiserror::Error;

use ap_core::Waypoint;

/// Errors produced by `ap-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("polyline has no points")]
    EmptyPolyline,

    #[error("polyline point {index} is not finite: {point}")]
    NonFinitePoint { index: usize, point: Waypoint },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
