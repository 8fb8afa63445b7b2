//! Polyline measurement and progress interpolation.
//!
//! # Interpolation model
//!
//! Progress is a fraction of *distance travelled*, not of waypoint count:
//!
//! ```text
//! cumulative[i]  = Σ distance(p[k], p[k+1]) for k < i      (cumulative[0] = 0)
//! target         = progress × cumulative[last]
//! segment        = first i with cumulative[i] ≥ target      → [i-1, i]
//! position       = lerp(p[i-1], p[i], (target - cumulative[i-1]) / seg_len)
//! ```
//!
//! Lat/lng are interpolated linearly inside a segment.  Segments are at most
//! a few hundred metres, where the difference from a true great-circle
//! interpolation is far below rendering resolution.

use serde::{Serialize, Serializer};

use ap_core::Waypoint;

use crate::{SpatialError, SpatialResult};

// ── Polyline ──────────────────────────────────────────────────────────────────

/// An ordered, non-empty list of finite waypoints with its cumulative
/// distance table computed once up front.
///
/// Interpolation is then a binary search plus one lerp, which keeps
/// per-frame cost flat for hundreds of agents.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points:     Vec<Waypoint>,
    /// `cumulative[i]` = metres from `points[0]` to `points[i]` along the line.
    cumulative: Vec<f64>,
}

impl Polyline {
    /// Build from `points`.  Fails on an empty list or a non-finite point.
    pub fn new(points: Vec<Waypoint>) -> SpatialResult<Self> {
        if points.is_empty() {
            return Err(SpatialError::EmptyPolyline);
        }
        if let Some((index, &point)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(SpatialError::NonFinitePoint { index, point });
        }
        let cumulative = cumulative_distances(&points);
        Ok(Self { points, cumulative })
    }

    #[inline]
    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    /// Number of waypoints (always ≥ 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Waypoint {
        self.points[0]
    }

    #[inline]
    pub fn last(&self) -> Waypoint {
        self.points[self.points.len() - 1]
    }

    /// Total length in metres.
    #[inline]
    pub fn length_m(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// The cumulative distance table, one entry per waypoint.
    #[inline]
    pub fn cumulative_m(&self) -> &[f64] {
        &self.cumulative
    }

    /// Interpolated position at `progress` (clamped to the endpoints).
    pub fn position_at(&self, progress: f64) -> Waypoint {
        locate(&self.points, &self.cumulative, progress)
    }
}

impl Serialize for Polyline {
    /// Serialises as the bare waypoint array, the same shape upstream sends.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// Sum of great-circle distances between consecutive waypoints, in metres.
///
/// `0.0` for zero or one point.  Appending points never decreases it.
pub fn total_length(points: &[Waypoint]) -> f64 {
    points.windows(2).map(|w| w[0].distance_m(w[1])).sum()
}

/// Interpolated position at `progress` along `points`.
///
/// Returns `None` only for an empty slice.  `progress <= 0` yields the first
/// point; `progress >= 1`, a zero-length line, or a target that falls off
/// the end through rounding yields the last point.
pub fn position_at_progress(points: &[Waypoint], progress: f64) -> Option<Waypoint> {
    if points.is_empty() {
        return None;
    }
    let cumulative = cumulative_distances(points);
    Some(locate(points, &cumulative, progress))
}

// ── Internals ─────────────────────────────────────────────────────────────────

fn cumulative_distances(points: &[Waypoint]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    cumulative.push(acc);
    for w in points.windows(2) {
        acc += w[0].distance_m(w[1]);
        cumulative.push(acc);
    }
    cumulative
}

/// Shared interpolation core.  `points` is non-empty and
/// `cumulative.len() == points.len()`.
fn locate(points: &[Waypoint], cumulative: &[f64], progress: f64) -> Waypoint {
    let first = points[0];
    let last  = points[points.len() - 1];
    let total = cumulative[cumulative.len() - 1];

    // NaN progress falls through both comparisons; treat it as "not started".
    if points.len() == 1 || progress <= 0.0 || progress.is_nan() {
        return first;
    }
    if progress >= 1.0 || total <= 0.0 {
        return last;
    }

    let target = progress * total;
    // cumulative[0] = 0 < target, so the first index with d >= target is ≥ 1.
    let end = cumulative.partition_point(|&d| d < target);
    if end == 0 || end >= points.len() {
        return last;
    }
    let start = end - 1;

    let seg_len = cumulative[end] - cumulative[start];
    if seg_len <= 0.0 {
        return points[end];
    }
    let t = (target - cumulative[start]) / seg_len;
    points[start].lerp(points[end], t)
}
