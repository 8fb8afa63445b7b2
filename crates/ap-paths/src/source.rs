//! Upstream activity sources.
//!
//! # Pluggability
//!
//! [`PathStore`](crate::PathStore) talks to upstream through the
//! [`ActivitySource`] trait, so the backing service can be swapped without
//! touching caching or validation.  Three implementations ship here:
//!
//! - [`StaticSource`]: in-memory records, call counting, injectable failure
//!   and latency.  Used by tests and the replay demo.
//! - [`JsonFileSource`]: the same payload read from disk.
//! - [`HttpActivitySource`] (`http` feature): `GET {base}/api/activities`.
//!
//! Sources return raw record values; validation happens in the store.

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use ap_core::parse_timestamp;

use crate::wire::decode_payload;
use crate::{RawActivity, SourceError, SourceResult};

// ── Query ─────────────────────────────────────────────────────────────────────

/// Parameters for one upstream fetch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActivityQuery {
    /// Restrict to activities in progress at `now`.
    pub ongoing_only: bool,
    /// The instant the query is made at, from the store's clock.
    pub now: DateTime<Utc>,
}

impl ActivityQuery {
    /// `true` if `record` should be returned for this query.
    ///
    /// An ongoing record has started (or has no parsable start) and has not
    /// ended.  Records that do not decode are kept so validation can report
    /// them.
    pub fn admits(&self, record: &Value) -> bool {
        if !self.ongoing_only {
            return true;
        }
        let Ok(raw) = RawActivity::from_value(record.clone()) else {
            return true;
        };
        let started = raw
            .start_date
            .as_deref()
            .and_then(parse_timestamp)
            .is_none_or(|start| start <= self.now);
        let ended = raw
            .end_date
            .as_deref()
            .and_then(parse_timestamp)
            .is_some_and(|end| end <= self.now);
        started && !ended
    }
}

// ── ActivitySource trait ──────────────────────────────────────────────────────

/// Pluggable upstream of raw activity records.
///
/// Implementations must be `Send + Sync`; the store is shared between tasks
/// and the returned future must be `Send` so the store's own future is.
pub trait ActivitySource: Send + Sync {
    /// Fetch every record matching `query`.  A failure here is a failure of
    /// the whole batch; per-record problems are left to validation.
    fn fetch_activities(
        &self,
        query: &ActivityQuery,
    ) -> impl Future<Output = SourceResult<Vec<Value>>> + Send;
}

// ── StaticSource ──────────────────────────────────────────────────────────────

/// In-memory source.
#[derive(Debug, Default)]
pub struct StaticSource {
    records: Mutex<Vec<Value>>,
    calls:   AtomicUsize,
    failing: AtomicBool,
    delay:   Option<Duration>,
}

impl StaticSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records: Mutex::new(records), ..Self::default() }
    }

    /// Sleep for `delay` (tokio time) before answering each fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the records served by subsequent fetches.
    pub fn set_records(&self, records: Vec<Value>) {
        *self.records.lock().unwrap_or_else(PoisonError::into_inner) = records;
    }

    /// While `true`, every fetch fails with [`SourceError::Request`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches started so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ActivitySource for StaticSource {
    async fn fetch_activities(&self, query: &ActivityQuery) -> SourceResult<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Request("static source set to fail".to_owned()));
        }
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.iter().filter(|r| query.admits(r)).cloned().collect())
    }
}

// ── JsonFileSource ────────────────────────────────────────────────────────────

/// Reads a JSON payload (bare array or `{ success, activities }` envelope)
/// from a file on every fetch.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ActivitySource for JsonFileSource {
    async fn fetch_activities(&self, query: &ActivityQuery) -> SourceResult<Vec<Value>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let payload: Value = serde_json::from_slice(&bytes)?;
        let records = decode_payload(payload)?;
        Ok(records.into_iter().filter(|r| query.admits(r)).collect())
    }
}

// ── HttpActivitySource ────────────────────────────────────────────────────────

/// `GET {base_url}/api/activities`, with `?ongoing=true` for ongoing-only
/// queries.  Filtering is left to the server.
#[cfg(feature = "http")]
#[derive(Clone, Debug)]
pub struct HttpActivitySource {
    client:   reqwest::Client,
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpActivitySource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, query: &ActivityQuery) -> String {
        if query.ongoing_only {
            format!("{}/api/activities?ongoing=true", self.base_url)
        } else {
            format!("{}/api/activities", self.base_url)
        }
    }
}

#[cfg(feature = "http")]
impl ActivitySource for HttpActivitySource {
    async fn fetch_activities(&self, query: &ActivityQuery) -> SourceResult<Vec<Value>> {
        let url = self.endpoint(query);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Request(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(SourceError::Status { status: status.as_u16(), body });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;
        decode_payload(payload)
    }
}
