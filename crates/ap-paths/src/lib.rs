//! `ap-paths`: authoritative activity paths, from ingestion and validation to caching.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`wire`]      | `RawActivity`, `RawPath`, `RawWaypoint`, payload decoding   |
//! | [`validate`]  | the per-record validation pipeline, `IngestReport`         |
//! | [`path`]      | `ActivityPath`: immutable, validated journey               |
//! | [`index`]     | `PathIndex`: `AgentId → [Arc<ActivityPath>]`               |
//! | [`source`]    | `ActivitySource` trait + static, JSON-file, HTTP sources    |
//! | [`store`]     | `PathStore`: TTL cache, single-flight fetch, stale fallback |
//! | [`error`]     | `SourceError`, `RecordError`                                |
//!
//! # Cache model (summary)
//!
//! ```text
//! fetch_paths(opts)
//!   fresh cache && !force     → cached Arc<PathIndex>, no I/O
//!   another fetch in flight   → wait for it, reuse its result if it matches
//!   otherwise                 → source → validate each record → publish
//!   source failure            → log, keep serving the last good index
//! ```
//!
//! Indexes are never mutated after publication; a refresh builds a new one
//! and swaps the `Arc`.

pub mod error;
pub mod index;
pub mod path;
pub mod source;
pub mod store;
pub mod validate;
pub mod wire;


pub use error::{RecordError, SourceError, SourceResult};
pub use index::PathIndex;
pub use path::ActivityPath;
pub use source::{ActivityQuery, ActivitySource, JsonFileSource, StaticSource};
#[cfg(feature = "http")]
pub use source::HttpActivitySource;
pub use store::{FetchOptions, PathStore, PathStoreConfig};
pub use validate::{build_index, filter_waypoints, validate_record, IngestReport};
pub use wire::{RawActivity, RawPath, RawWaypoint};
