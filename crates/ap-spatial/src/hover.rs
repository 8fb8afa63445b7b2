//! Hover and selection hit-testing over projected agent positions.
//!
//! The renderer projects every agent's `current_position` to screen space
//! once per paint; it can then bulk-load those points into a [`HoverIndex`]
//! and answer cursor queries in O(log n) instead of scanning every agent.

use rstar::{Envelope, PointDistance, RTree, RTreeObject, SelectionFunction, AABB};

use ap_core::{point_in_circle, point_in_polygon, AgentId, Point2};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a screen-space `[x, y]` point with the
/// associated agent.
#[derive(Clone, Debug)]
struct HoverEntry {
    point: [f64; 2],
    agent: AgentId,
}

impl RTreeObject for HoverEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for HoverEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Selects entries inside an axis-aligned screen rectangle.
struct InRect(AABB<[f64; 2]>);

impl SelectionFunction<HoverEntry> for InRect {
    fn should_unpack_parent(&self, envelope: &AABB<[f64; 2]>) -> bool {
        self.0.intersects(envelope)
    }

    fn should_unpack_leaf(&self, leaf: &HoverEntry) -> bool {
        self.0.contains_point(&leaf.point)
    }
}

// ── HoverIndex ────────────────────────────────────────────────────────────────

/// Immutable spatial index of projected agent positions for one frame.
pub struct HoverIndex {
    tree: RTree<HoverEntry>,
}

impl HoverIndex {
    /// Bulk-load from `(agent, screen point)` pairs.
    pub fn build<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = (AgentId, Point2)>,
    {
        let entries: Vec<HoverEntry> = positions
            .into_iter()
            .filter(|(_, p)| p.x.is_finite() && p.y.is_finite())
            .map(|(agent, p)| HoverEntry { point: [p.x, p.y], agent })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The agent closest to `cursor`, if it lies within `radius` pixels.
    pub fn agent_at(&self, cursor: Point2, radius: f64) -> Option<&AgentId> {
        self.tree
            .nearest_neighbor(&[cursor.x, cursor.y])
            .filter(|e| point_in_circle(cursor, Point2::new(e.point[0], e.point[1]), radius))
            .map(|e| &e.agent)
    }

    /// All agents within `radius` of `center`, in no particular order.
    pub fn agents_within(&self, center: Point2, radius: f64) -> Vec<&AgentId> {
        self.tree
            .locate_within_distance([center.x, center.y], radius * radius)
            .map(|e| &e.agent)
            .collect()
    }

    /// All agents inside the axis-aligned rectangle with top-left corner
    /// `origin` (edges inclusive).
    pub fn agents_in_rect(&self, origin: Point2, width: f64, height: f64) -> Vec<&AgentId> {
        let rect = InRect(AABB::from_corners(
            [origin.x, origin.y],
            [origin.x + width, origin.y + height],
        ));
        self.tree
            .locate_with_selection_function(rect)
            .map(|e| &e.agent)
            .collect()
    }

    /// All agents inside `polygon` (lasso selection).  The polygon's
    /// bounding box prunes the tree before the exact ray-casting test.
    pub fn agents_in_polygon(&self, polygon: &[Point2]) -> Vec<&AgentId> {
        if polygon.len() < 3 {
            return vec![];
        }
        let (mut lo, mut hi) = ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]);
        for p in polygon {
            lo = [lo[0].min(p.x), lo[1].min(p.y)];
            hi = [hi[0].max(p.x), hi[1].max(p.y)];
        }
        self.tree
            .locate_with_selection_function(InRect(AABB::from_corners(lo, hi)))
            .filter(|e| point_in_polygon(Point2::new(e.point[0], e.point[1]), polygon))
            .map(|e| &e.agent)
            .collect()
    }
}
