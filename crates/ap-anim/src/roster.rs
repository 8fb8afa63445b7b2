//! Agent profiles and the CSV roster loader.
//!
//! # CSV format
//!
//! ```csv
//! id,name,lat,lng,social_class
//! ctz_4412,Marco Polo,45.4380,12.3358,Cittadini
//! ctz_0007,Elena Dandolo,,,Nobili
//! ```
//!
//! Only `id` is required.  An empty or non-finite `lat`/`lng` leaves the
//! agent without a base position: it animates if it has paths and is
//! otherwise not shown.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use ap_core::{AgentId, Waypoint};

use crate::{AnimError, AnimResult};

/// Descriptive data for one agent.  Owned by the caller; the animator only
/// holds shared references.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id:           AgentId,
    pub name:         Option<String>,
    /// Home or workplace; used to place agents with no usable path.
    pub position:     Option<Waypoint>,
    pub social_class: Option<String>,
}

impl AgentProfile {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self { id: id.into(), name: None, position: None, social_class: None }
    }

    pub fn with_position(mut self, position: Waypoint) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RosterRecord {
    id:           String,
    #[serde(default)]
    name:         Option<String>,
    #[serde(default)]
    lat:          Option<f64>,
    #[serde(default)]
    lng:          Option<f64>,
    #[serde(default)]
    social_class: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a roster from a CSV file.
pub fn load_roster_csv(path: &Path) -> AnimResult<Vec<AgentProfile>> {
    let file = std::fs::File::open(path).map_err(AnimError::Io)?;
    load_roster_reader(file)
}

/// Like [`load_roster_csv`] but accepts any `Read` source.
pub fn load_roster_reader<R: Read>(reader: R) -> AnimResult<Vec<AgentProfile>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut roster = Vec::new();

    for (line, result) in csv_reader.deserialize::<RosterRecord>().enumerate() {
        let row = result.map_err(|e| AnimError::Roster(e.to_string()))?;
        let id = row.id.trim();
        if id.is_empty() {
            return Err(AnimError::Roster(format!("row {}: empty agent id", line + 1)));
        }
        let position = match (row.lat, row.lng) {
            (Some(lat), Some(lng)) => Some(Waypoint::new(lat, lng)).filter(|p| p.is_finite()),
            _ => None,
        };
        roster.push(AgentProfile {
            id: AgentId::from(id),
            name: row.name.filter(|n| !n.trim().is_empty()),
            position,
            social_class: row.social_class.filter(|s| !s.trim().is_empty()),
        });
    }

    Ok(roster)
}
