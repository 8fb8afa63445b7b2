//! The replay's activity source and its built-in data.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use ap_paths::{ActivityQuery, ActivitySource, JsonFileSource, SourceResult, StaticSource};
#[cfg(feature = "http")]
use ap_paths::HttpActivitySource;

use crate::config::ReplayConfig;

/// Whichever source the config selects.
pub enum ReplaySource {
    BuiltIn(StaticSource),
    File(JsonFileSource),
    #[cfg(feature = "http")]
    Http(HttpActivitySource),
}

impl ReplaySource {
    pub fn from_config(config: &ReplayConfig, now: DateTime<Utc>) -> Result<Self> {
        if let Some(url) = &config.api_base_url {
            return Self::http(url);
        }
        Ok(match &config.activities_path {
            Some(path) => Self::File(JsonFileSource::new(path)),
            None => Self::BuiltIn(StaticSource::new(built_in_activities(now))),
        })
    }

    #[cfg(feature = "http")]
    fn http(url: &str) -> Result<Self> {
        Ok(Self::Http(HttpActivitySource::new(url)))
    }

    #[cfg(not(feature = "http"))]
    fn http(url: &str) -> Result<Self> {
        anyhow::bail!("api_base_url {url:?} needs the `http` feature")
    }

    pub fn describe(&self) -> String {
        match self {
            Self::BuiltIn(_) => "built-in activities".to_owned(),
            Self::File(s) => format!("file {}", s.path().display()),
            #[cfg(feature = "http")]
            Self::Http(s) => format!("api {}", s.base_url()),
        }
    }
}

impl ActivitySource for ReplaySource {
    async fn fetch_activities(&self, query: &ActivityQuery) -> SourceResult<Vec<Value>> {
        match self {
            Self::BuiltIn(s) => s.fetch_activities(query).await,
            Self::File(s) => s.fetch_activities(query).await,
            #[cfg(feature = "http")]
            Self::Http(s) => s.fetch_activities(query).await,
        }
    }
}

// ── Built-in data ─────────────────────────────────────────────────────────────

pub const BUILT_IN_ROSTER: &str = "\
id,name,lat,lng,social_class\n\
ctz_marco,Marco Polo,45.4380,12.3358,Cittadini\n\
ctz_elena,Elena Dandolo,45.4340,12.3388,Nobili\n\
ctz_piero,Piero Zen,45.4365,12.3320,Popolani\n\
ctz_lucia,Lucia Corner,45.4331,12.3402,Popolani\n\
ctz_ghost,Nobody Known,,,\n\
";

/// A handful of journeys around the Rialto, timed relative to `now` so
/// every reconciliation rule has something to act on.
fn built_in_activities(now: DateTime<Utc>) -> Vec<Value> {
    let at = |mins: i64| (now + Duration::minutes(mins)).to_rfc3339();
    vec![
        // In progress with a known window.
        json!({
            "activityId": "act-001",
            "citizenId":  "ctz_marco",
            "type":       "goto_work",
            "path":       [{ "lat": 45.4380, "lng": 12.3358 }, { "lat": 45.4371, "lng": 12.3370 },
                           { "lat": 45.4362, "lng": 12.3376 }],
            "startDate":  at(-10),
            "endDate":    at(20),
            "transportMode": "walk",
        }),
        // Open-ended, started recently.  The path arrives JSON-encoded.
        json!({
            "activityId": "act-002",
            "citizen":    "ctz_elena",
            "type":       "deliver_goods",
            "path":       "[{\"lat\":45.4340,\"lng\":12.3388},{\"lat\":45.4352,\"lng\":12.3371}]",
            "startDate":  at(-15),
        }),
        // Two undated paths: seeded start, then round-robin.
        json!({
            "activityId": "act-003",
            "citizenId":  "ctz_piero",
            "type":       "work",
            "path":       [{ "lat": 45.4365, "lng": 12.3320 }, { "lat": 45.4369, "lng": 12.3331 }],
        }),
        json!({
            "activityId": "act-004",
            "citizenId":  "ctz_piero",
            "type":       "fishing",
            "path":       [{ "lat": 45.4369, "lng": 12.3331 }, { "lat": "??", "lng": 12.3340 },
                           { "lat": 45.4365, "lng": 12.3320 }],
        }),
        // Skipped: a single waypoint.
        json!({
            "activityId": "act-005",
            "citizenId":  "ctz_lucia",
            "path":       [{ "lat": 45.4331, "lng": 12.3402 }],
        }),
    ]
}
