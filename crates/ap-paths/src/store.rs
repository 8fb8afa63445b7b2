//! `PathStore`: the authoritative, cached view of every agent's paths.
//!
//! # Concurrency
//!
//! ```text
//! published  std RwLock<Published>   swapped whole on success, read by everyone
//! gate       tokio Mutex<()>         held for the duration of one upstream fetch
//! in_flight  AtomicBool              mirrors "gate is held", lock-free for callers
//! ```
//!
//! A caller that finds the gate taken waits on it, then serves what the
//! winner published if it is fresh and of the same query kind, so N
//! concurrent refreshes of one kind cost one upstream call.  Otherwise (a
//! different kind, or a winner cancelled before publishing) the caller
//! fetches under the gate itself.
//! No lock other than the gate is ever held across an `.await`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, error, info};

use ap_core::{secs_between, Clock, GeoBounds, SystemClock};

use crate::validate::{build_index, IngestReport};
use crate::{ActivityPath, ActivityQuery, ActivitySource, PathIndex, SourceError};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Store configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathStoreConfig {
    /// Cache lifetime in seconds.  Default: 300.
    pub ttl_secs: u64,

    /// Plausible extent of the city.  Waypoints outside it are dropped during
    /// validation.  `None` disables the check.
    pub bounds: Option<GeoBounds>,
}

impl Default for PathStoreConfig {
    fn default() -> Self {
        Self { ttl_secs: 300, bounds: None }
    }
}

/// Per-call options for [`PathStore::fetch_paths`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Bypass the TTL and always hit the source (still single-flight).
    pub force_refresh: bool,
    /// Only activities in progress now.  The cache remembers which kind of
    /// query filled it; a different kind is never served from cache.
    pub ongoing_only: bool,
}

impl FetchOptions {
    pub fn forced() -> Self {
        Self { force_refresh: true, ..Self::default() }
    }

    pub fn ongoing() -> Self {
        Self { ongoing_only: true, ..Self::default() }
    }
}

// ── Published state ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Published {
    index:   Arc<PathIndex>,
    /// When `index` was fetched and with which `ongoing_only`.  `None` means
    /// never fetched or invalidated.
    fetched: Option<(DateTime<Utc>, bool)>,
}

/// Clears the in-flight flag however the fetch future ends, including
/// cancellation.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ── PathStore ─────────────────────────────────────────────────────────────────

/// TTL-cached, single-flight view of upstream activity paths.
///
/// Construct once per application and share (`Arc<PathStore<_>>`); every
/// method takes `&self`.  Readers never block on a fetch: they see the last
/// published index until a new one replaces it.
pub struct PathStore<S> {
    source:      S,
    clock:       Arc<dyn Clock>,
    config:      PathStoreConfig,
    published:   RwLock<Published>,
    gate:        tokio::sync::Mutex<()>,
    in_flight:   AtomicBool,
    last_error:  Mutex<Option<Arc<SourceError>>>,
    last_report: Mutex<Option<IngestReport>>,
}

impl<S: ActivitySource> PathStore<S> {
    pub fn new(source: S, config: PathStoreConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    pub fn with_clock(source: S, config: PathStoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            config,
            published: RwLock::new(Published::default()),
            gate: tokio::sync::Mutex::new(()),
            in_flight: AtomicBool::new(false),
            last_error: Mutex::new(None),
            last_report: Mutex::new(None),
        }
    }

    /// Return the path index, refreshing from the source when the cache is
    /// stale, invalidated, filled by a different kind of query, or
    /// `force_refresh` is set.
    ///
    /// Never fails: on a source error the previous index (possibly empty) is
    /// returned and the error is kept in [`last_error`](Self::last_error).
    pub async fn fetch_paths(&self, opts: FetchOptions) -> Arc<PathIndex> {
        if !opts.force_refresh {
            if let Some(index) = self.cached(opts.ongoing_only) {
                return index;
            }
        }

        let (_gate, waited) = match self.gate.try_lock() {
            Ok(guard) => (guard, false),
            Err(_) => {
                debug!(
                    ongoing = opts.ongoing_only,
                    "activity fetch already in flight; waiting for it"
                );
                (self.gate.lock().await, true)
            }
        };

        // A fetch may have published between the cache check and the gate.
        // After waiting, reuse it only if it answers this kind of query.
        if !opts.force_refresh || waited {
            if let Some(index) = self.cached(opts.ongoing_only) {
                return index;
            }
        }

        let _flag = InFlight::raise(&self.in_flight);
        let query = ActivityQuery { ongoing_only: opts.ongoing_only, now: self.clock.now() };

        match self.source.fetch_activities(&query).await {
            Ok(records) => {
                let (index, report) = build_index(records, self.config.bounds.as_ref());
                info!(
                    agents   = index.agent_count(),
                    paths    = index.path_count(),
                    skipped  = report.skipped,
                    ongoing  = opts.ongoing_only,
                    "activity paths refreshed"
                );
                self.publish(index, report, query)
            }
            Err(e) => {
                error!(error = %e, "activity fetch failed; serving last good index");
                *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(e));
                self.index()
            }
        }
    }

    fn publish(&self, index: PathIndex, report: IngestReport, query: ActivityQuery) -> Arc<PathIndex> {
        let index = Arc::new(index);
        {
            let mut published = self.published.write().unwrap_or_else(PoisonError::into_inner);
            published.index = Arc::clone(&index);
            published.fetched = Some((query.now, query.ongoing_only));
        }
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = None;
        *self.last_report.lock().unwrap_or_else(PoisonError::into_inner) = Some(report);
        index
    }

    fn cached(&self, ongoing_only: bool) -> Option<Arc<PathIndex>> {
        let published = self.published.read().unwrap_or_else(PoisonError::into_inner);
        let (fetched_at, fetched_ongoing) = published.fetched?;
        let age = secs_between(fetched_at, self.clock.now());
        (fetched_ongoing == ongoing_only && age < self.config.ttl_secs as f64)
            .then(|| Arc::clone(&published.index))
    }
}

impl<S> PathStore<S> {
    /// The last published index.  No I/O.
    pub fn index(&self) -> Arc<PathIndex> {
        Arc::clone(&self.published.read().unwrap_or_else(PoisonError::into_inner).index)
    }

    /// Paths for `agent` from the last published index, empty if unknown.
    pub fn paths_for_agent(&self, agent: &str) -> Vec<Arc<ActivityPath>> {
        self.index().paths_for(agent).to_vec()
    }

    /// Every path from the last published index.
    pub fn all_paths(&self) -> Vec<Arc<ActivityPath>> {
        self.index().all_paths()
    }

    /// Forget the cache timestamp so the next fetch goes upstream.  The
    /// current index stays readable.
    pub fn invalidate(&self) {
        self.published.write().unwrap_or_else(PoisonError::into_inner).fetched = None;
    }

    /// `true` while an upstream fetch is running.
    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// When the published index was fetched, if it is still considered
    /// cached.
    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .fetched
            .map(|(at, _)| at)
    }

    /// The most recent source failure, cleared by the next successful fetch.
    pub fn last_error(&self) -> Option<Arc<SourceError>> {
        self.last_error.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Counters from the most recent successful ingestion.
    pub fn last_report(&self) -> Option<IngestReport> {
        *self.last_report.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &PathStoreConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
