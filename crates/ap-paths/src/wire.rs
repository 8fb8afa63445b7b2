//! Upstream wire format.
//!
//! # Record shape
//!
//! ```json
//! {
//!   "activityId":    "act-1739",
//!   "citizenId":     "ctz_4412",           // primary agent id
//!   "citizen":       "marco_polo",         // fallback agent id
//!   "path":          "[{\"lat\":45.43,\"lng\":12.33}, …]",   // or a native array
//!   "type":          "goto_work",
//!   "startDate":     "2025-06-01T09:30:00Z",
//!   "endDate":       null,
//!   "notes":         "…",
//!   "transportMode": "gondola",
//!   "fromBuilding":  "bld_12",
//!   "toBuilding":    "bld_40"
//! }
//! ```
//!
//! PascalCase field names (`ActivityId`, `CitizenId`, `Path`, …) are accepted
//! as aliases.  Every field is optional at this layer; the validation
//! pipeline decides what is required.
//!
//! # Payload envelope
//!
//! Sources deliver either a bare array of records or an object
//! `{ "success": bool, "activities": [...], "error": "..." }`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{RecordError, SourceError, SourceResult};

// ── RawActivity ───────────────────────────────────────────────────────────────

/// One activity record exactly as upstream sent it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivity {
    #[serde(alias = "ActivityId", alias = "id")]
    pub activity_id: Option<String>,

    #[serde(alias = "CitizenId")]
    pub citizen_id: Option<String>,

    #[serde(alias = "Citizen")]
    pub citizen: Option<String>,

    #[serde(alias = "Path")]
    pub path: Option<RawPath>,

    #[serde(rename = "type", alias = "Type", alias = "category")]
    pub category: Option<String>,

    #[serde(alias = "StartDate", alias = "startTime")]
    pub start_date: Option<String>,

    #[serde(alias = "EndDate", alias = "endTime")]
    pub end_date: Option<String>,

    #[serde(alias = "Notes")]
    pub notes: Option<String>,

    #[serde(alias = "TransportMode")]
    pub transport_mode: Option<String>,

    #[serde(alias = "FromBuilding", alias = "fromLocationId")]
    pub from_building: Option<String>,

    #[serde(alias = "ToBuilding", alias = "toLocationId")]
    pub to_building: Option<String>,
}

impl RawActivity {
    /// Decode one record, reporting failure as a skippable [`RecordError`].
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        serde_json::from_value(value).map_err(|e| RecordError::Malformed(e.to_string()))
    }
}

// ── RawPath ───────────────────────────────────────────────────────────────────

/// The `path` field, which upstream sends either as a JSON-encoded string or
/// as a native array.  Anything else is kept as `Other` so the record still
/// decodes and the pipeline can report a precise reason.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPath {
    Points(Vec<RawWaypoint>),
    Encoded(String),
    Other(Value),
}

impl RawPath {
    /// Step 1 of validation: turn the payload into candidate waypoints.
    pub fn parse(&self) -> Result<Vec<RawWaypoint>, RecordError> {
        match self {
            RawPath::Points(points) => Ok(points.clone()),
            RawPath::Encoded(text) => serde_json::from_str::<Vec<RawWaypoint>>(text)
                .map_err(|e| RecordError::UnparsablePath(e.to_string())),
            RawPath::Other(value) => Err(RecordError::UnparsablePath(format!(
                "expected array or JSON string, got {}",
                json_kind(value)
            ))),
        }
    }
}

// ── RawWaypoint ───────────────────────────────────────────────────────────────

/// A waypoint candidate before filtering.
///
/// Decoding never fails: a non-object element, a missing key, or a
/// non-numeric value simply leaves the component `None`, so a single bad
/// point is filtered out instead of poisoning the whole path.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RawWaypoint {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl RawWaypoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat: Some(lat), lng: Some(lng) }
    }
}

impl<'de> Deserialize<'de> for RawWaypoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let component = |key: &str| value.get(key).and_then(Value::as_f64);
        Ok(Self { lat: component("lat"), lng: component("lng") })
    }
}

// ── Payload decoding ──────────────────────────────────────────────────────────

/// Split a source payload into individual record values.
pub fn decode_payload(payload: Value) -> SourceResult<Vec<Value>> {
    match payload {
        Value::Array(records) => Ok(records),
        Value::Object(mut envelope) => {
            if envelope.get("success").and_then(Value::as_bool) == Some(false) {
                let reason = envelope
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("no reason given")
                    .to_owned();
                return Err(SourceError::Upstream(reason));
            }
            match envelope.remove("activities") {
                Some(Value::Array(records)) => Ok(records),
                Some(other) => Err(SourceError::Decode(format!(
                    "\"activities\" is {}, expected array",
                    json_kind(&other)
                ))),
                None => Err(SourceError::Decode("missing \"activities\" field".to_owned())),
            }
        }
        other => Err(SourceError::Decode(format!(
            "expected array or object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}
