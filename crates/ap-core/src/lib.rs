//! `ap-core`: foundational types for the activity-path animation workspace.
//!
//! This crate is a dependency of every other `ap-*` crate.  It intentionally
//! has no `ap-*` dependencies and few external ones (`rand`, `chrono`,
//! `serde`, `thiserror`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `PathId` (cheap-to-clone string identifiers)   |
//! | [`geo`]     | `Waypoint`, `GeoBounds`, haversine distance               |
//! | [`hit`]     | `Point2`, point-in-polygon / circle / rect hit tests      |
//! | [`rng`]     | `SeededRandom`: string-seeded, platform-stable LCG       |
//! | [`time`]    | `Clock`, `SystemClock`, `ManualClock`, timestamp parsing  |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |

pub mod error;
pub mod geo;
pub mod hit;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{distance, GeoBounds, Waypoint};
pub use hit::{point_in_circle, point_in_polygon, point_in_rect, Point2};
pub use ids::{AgentId, PathId};
pub use rng::{create_generator, SeededRandom};
pub use time::{parse_timestamp, secs_between, Clock, ManualClock, SystemClock};
