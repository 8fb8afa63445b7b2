//! Planar hit tests used by the hover/selection layer.
//!
//! These work on projected screen-space points, not on lat/lng: the renderer
//! projects first, then asks "is the cursor over this shape?".

use serde::{Deserialize, Serialize};

/// A point in a planar (screen or projected) coordinate system.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_sq(self, other: Point2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Even-odd ray casting.  Polygons with fewer than three vertices contain
/// nothing.  Points exactly on an edge may land on either side.
pub fn point_in_polygon(point: Point2, polygon: &[Point2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        let crosses = (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// `true` if `point` lies within `radius` of `center` (boundary inclusive).
#[inline]
pub fn point_in_circle(point: Point2, center: Point2, radius: f64) -> bool {
    point.distance_sq(center) <= radius * radius
}

/// `true` if `point` lies inside the axis-aligned rectangle with top-left
/// corner `origin` (edges inclusive).
#[inline]
pub fn point_in_rect(point: Point2, origin: Point2, width: f64, height: f64) -> bool {
    point.x >= origin.x
        && point.x <= origin.x + width
        && point.y >= origin.y
        && point.y <= origin.y + height
}
