//! Geographic coordinate type and geodesic utilities.
//!
//! `Waypoint` uses `f64` latitude/longitude.  Paths are interpolated along
//! metres-scale segments inside a single city, and `f32` rounding at that
//! scale is visible as jitter once positions are projected to screen space.

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres (spherical approximation).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

impl Waypoint {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Construct a waypoint, rejecting NaN and infinite components.
    pub fn try_new(lat: f64, lng: f64) -> CoreResult<Self> {
        let p = Self { lat, lng };
        if p.is_finite() {
            Ok(p)
        } else {
            Err(CoreError::InvalidCoordinate { lat, lng })
        }
    }

    /// `true` if both components are finite real numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Accuracy: within the usual ±0.5 % of the spherical model; ample for
    /// city-scale paths.  Symmetric, and exactly zero for identical points.
    pub fn distance_m(self, other: Waypoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Linear interpolation in lat/lng space.  `t` is not clamped.
    #[inline]
    pub fn lerp(self, other: Waypoint, t: f64) -> Waypoint {
        Waypoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }

    /// Shift by a raw degree offset.
    #[inline]
    pub fn offset(self, d_lat: f64, d_lng: f64) -> Waypoint {
        Waypoint { lat: self.lat + d_lat, lng: self.lng + d_lng }
    }

    /// Approximate bounding-box check, much cheaper than `distance_m` for
    /// quick rejection.
    #[inline]
    pub fn within_bbox(self, center: Waypoint, half_deg: f64) -> bool {
        (self.lat - center.lat).abs() <= half_deg
            && (self.lng - center.lng).abs() <= half_deg
    }
}

impl std::fmt::Display for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Free-function form of [`Waypoint::distance_m`].
#[inline]
pub fn distance(a: Waypoint, b: Waypoint) -> f64 {
    a.distance_m(b)
}

// ── GeoBounds ─────────────────────────────────────────────────────────────────

/// An inclusive lat/lng rectangle describing the plausible extent of the
/// simulated city.  Waypoints outside it are treated as corrupt upstream data.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    pub const fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self { min_lat, max_lat, min_lng, max_lng }
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains(&self, p: Waypoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&p.lat)
            && (self.min_lng..=self.max_lng).contains(&p.lng)
    }
}
