//! Wall-clock model.
//!
//! # Design
//!
//! Positions are reconciled against real time ("where should this agent be
//! *now*?"), so every component that needs the current instant takes it from
//! a [`Clock`] instead of calling `Utc::now()` directly.  Production code
//! uses [`SystemClock`]; tests drive a [`ManualClock`] so cache expiry and
//! progress reconciliation are exact and repeatable.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of the current UTC instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock.  Clones share the same underlying instant, so a test
/// can hand one clone to a component and advance time through another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Timestamp helpers ─────────────────────────────────────────────────────────

/// Naive layouts seen in upstream records; interpreted as UTC.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse an upstream timestamp.
///
/// Accepts RFC 3339 (`2025-06-01T09:30:00Z`, `…+02:00`) and the offset-less
/// layouts in `NAIVE_FORMATS`, which are taken to be UTC.  Returns `None` for
/// blank or unparsable input; callers decide whether that is fatal.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Signed seconds from `from` to `to`, with millisecond resolution.
#[inline]
pub fn secs_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
