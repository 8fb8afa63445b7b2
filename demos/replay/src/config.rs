//! Replay configuration, read from an optional JSON file.
//!
//! ```json
//! {
//!   "activities_path": "activities.json",
//!   "roster_path":     "roster.csv",
//!   "ongoing_only":    false,
//!   "run_secs":        10,
//!   "store":    { "ttl_secs": 300, "bounds": { "min_lat": 45.40, "max_lat": 45.47, "min_lng": 12.30, "max_lng": 12.38 } },
//!   "animator": { "target_fps": 30, "assumed_activity_duration_secs": 1800 }
//! }
//! ```
//!
//! Every field is optional.  With no file at all the demo runs on built-in
//! activities and roster.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use ap_anim::AnimatorConfig;
use ap_paths::PathStoreConfig;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub store:    PathStoreConfig,
    pub animator: AnimatorConfig,

    /// JSON payload (bare array or `{ success, activities }`).  `None` uses
    /// the built-in activities.
    pub activities_path: Option<PathBuf>,

    /// Roster CSV.  `None` uses the built-in roster.
    pub roster_path: Option<PathBuf>,

    /// Base URL of a live activities API.  Requires the `http` feature and
    /// takes precedence over `activities_path`.
    pub api_base_url: Option<String>,

    pub ongoing_only: bool,

    /// Wall-clock run time in seconds.
    pub run_secs: f64,

    /// How often to ask the store for fresh paths.  The store's TTL decides
    /// whether that reaches the source.
    pub refresh_secs: u64,

    /// Log one line every this many update callbacks.
    pub report_every: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            store:           PathStoreConfig::default(),
            animator:        AnimatorConfig::default(),
            activities_path: None,
            roster_path:     None,
            api_base_url:    None,
            ongoing_only:    false,
            run_secs:        5.0,
            refresh_secs:    60,
            report_every:    60,
        }
    }
}

impl ReplayConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
