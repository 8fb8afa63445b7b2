//! `ap-spatial`: path geometry and screen-space hit-testing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`polyline`] | `Polyline`, `total_length`, `position_at_progress`         |
//! | [`hover`]    | `HoverIndex`: R-tree over projected agent positions       |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! Routing is deliberately absent: paths arrive fully formed from upstream
//! and are only measured and interpolated here.

pub mod error;
pub mod hover;
pub mod polyline;


pub use error::{SpatialError, SpatialResult};
pub use hover::HoverIndex;
pub use polyline::{position_at_progress, total_length, Polyline};
