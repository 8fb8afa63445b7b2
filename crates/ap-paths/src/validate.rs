//! The per-record validation pipeline.
//!
//! Every step either passes the record on or rejects it with a
//! [`RecordError`].  A rejected record is logged and skipped; it never
//! aborts the batch.
//!
//! ```text
//! RawActivity
//!   → path payload parses as a waypoint array      (UnparsablePath / MissingPath)
//!   → at least 2 candidates                        (TooFewWaypoints)
//!   → drop missing / non-finite / out-of-bounds    (filter_waypoints)
//!   → at least 2 survivors                         (TooFewValidWaypoints)
//!   → agent id from citizenId, else citizen        (MissingAgentId)
//!   → ActivityPath
//! ```

use serde_json::Value;
use tracing::{debug, warn};

use ap_core::{parse_timestamp, AgentId, GeoBounds, PathId, Waypoint};
use ap_spatial::Polyline;

use crate::{ActivityPath, PathIndex, RawActivity, RawWaypoint, RecordError};

/// Outcome counters for one ingestion pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records delivered by the source.
    pub received: usize,
    /// Records that became an `ActivityPath`.
    pub accepted: usize,
    /// Records rejected by the pipeline.
    pub skipped: usize,
    /// Accepted paths whose start time was missing or unparsable.
    pub flagged_start: usize,
}

/// Keep only waypoints with both components present, finite, and (when
/// `bounds` is set) inside the bounds.  Order is preserved.
pub fn filter_waypoints(candidates: &[RawWaypoint], bounds: Option<&GeoBounds>) -> Vec<Waypoint> {
    candidates
        .iter()
        .filter_map(|raw| match (raw.lat, raw.lng) {
            (Some(lat), Some(lng)) => Some(Waypoint::new(lat, lng)),
            _ => None,
        })
        .filter(|p| p.is_finite())
        .filter(|p| bounds.is_none_or(|b| b.contains(*p)))
        .collect()
}

/// Run the pipeline over one decoded record.
///
/// `ordinal` is the record's position in the batch; it names the path when
/// upstream sent no `activityId`.
pub fn validate_record(
    raw: RawActivity,
    ordinal: usize,
    bounds: Option<&GeoBounds>,
) -> Result<ActivityPath, RecordError> {
    let candidates = raw.path.as_ref().ok_or(RecordError::MissingPath)?.parse()?;
    if candidates.len() < 2 {
        return Err(RecordError::TooFewWaypoints { count: candidates.len() });
    }

    let points = filter_waypoints(&candidates, bounds);
    if points.len() < 2 {
        return Err(RecordError::TooFewValidWaypoints {
            valid: points.len(),
            total: candidates.len(),
        });
    }

    let agent_id = [raw.citizen_id.as_deref(), raw.citizen.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(AgentId::from)
        .ok_or(RecordError::MissingAgentId)?;

    let id = match raw.activity_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => PathId::from(id),
        _ => PathId::from(format!("{agent_id}#{ordinal}")),
    };

    let start_time = raw.start_date.as_deref().and_then(parse_timestamp);
    if start_time.is_none() {
        debug!(
            activity = %id,
            raw_start = ?raw.start_date,
            "activity has no usable start time; excluded from wall-clock reconciliation"
        );
    }
    let end_time = raw.end_date.as_deref().and_then(parse_timestamp);

    Ok(ActivityPath {
        id,
        agent_id,
        route: Polyline::new(points)?,
        category: raw.category.unwrap_or_default(),
        start_time,
        end_time,
        notes: raw.notes,
        transport_mode: raw.transport_mode,
        from_location_id: raw.from_building,
        to_location_id: raw.to_building,
    })
}

/// Validate a batch of raw record values into a fresh [`PathIndex`].
pub fn build_index(records: Vec<Value>, bounds: Option<&GeoBounds>) -> (PathIndex, IngestReport) {
    let mut index = PathIndex::new();
    let mut report = IngestReport { received: records.len(), ..IngestReport::default() };

    for (ordinal, value) in records.into_iter().enumerate() {
        let outcome = RawActivity::from_value(value)
            .and_then(|raw| validate_record(raw, ordinal, bounds));
        match outcome {
            Ok(path) => {
                if !path.has_valid_start() {
                    report.flagged_start += 1;
                }
                report.accepted += 1;
                index.insert(path);
            }
            Err(e) => {
                warn!(record = ordinal, reason = %e, "skipping activity record");
                report.skipped += 1;
            }
        }
    }

    debug!(
        received = report.received,
        accepted = report.accepted,
        skipped  = report.skipped,
        agents   = index.agent_count(),
        "built path index"
    );
    (index, report)
}
