//! The validated, immutable activity path.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ap_core::{secs_between, AgentId, PathId, Waypoint};
use ap_spatial::Polyline;

/// One agent journey: a validated polyline plus timing metadata.
///
/// Built only by the validation pipeline and never mutated afterwards; a
/// cache refresh supersedes it with a new instance.  Shared as
/// `Arc<ActivityPath>` between the index and any agent animating it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPath {
    pub id: PathId,

    pub agent_id: AgentId,

    /// At least two finite waypoints, cumulative distances precomputed.
    #[serde(rename = "waypoints")]
    pub route: Polyline,

    /// Free-form classification (`"goto_work"`, `"fishing"`, …).  Only feeds
    /// speed heuristics and colouring.
    pub category: String,

    /// `None` when upstream sent no start time or one that did not parse.
    /// Such paths animate normally but never take part in wall-clock
    /// reconciliation.
    pub start_time: Option<DateTime<Utc>>,

    /// `None` means open-ended: completion time unknown.
    pub end_time: Option<DateTime<Utc>>,

    pub notes: Option<String>,
    pub transport_mode: Option<String>,
    pub from_location_id: Option<String>,
    pub to_location_id: Option<String>,
}

impl ActivityPath {
    #[inline]
    pub fn waypoints(&self) -> &[Waypoint] {
        self.route.points()
    }

    /// Total path length in metres.
    #[inline]
    pub fn length_m(&self) -> f64 {
        self.route.length_m()
    }

    /// Interpolated position at `progress` in `[0, 1]`.
    #[inline]
    pub fn position_at(&self, progress: f64) -> Waypoint {
        self.route.position_at(progress)
    }

    /// `false` for paths flagged during ingestion for a missing or
    /// unparsable start time.
    #[inline]
    pub fn has_valid_start(&self) -> bool {
        self.start_time.is_some()
    }

    #[inline]
    pub fn is_open_ended(&self) -> bool {
        self.end_time.is_none()
    }

    /// Scheduled duration in seconds, when both ends are known.
    pub fn duration_secs(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(secs_between(start, end)),
            _ => None,
        }
    }

    /// `true` if `now` lies inside `[start_time, end_time]`.  A path missing
    /// either end has no window and always returns `false`.
    pub fn window_contains(&self, now: DateTime<Utc>) -> bool {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => start <= now && now <= end,
            _ => false,
        }
    }
}
