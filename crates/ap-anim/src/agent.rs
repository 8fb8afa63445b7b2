//! Live per-agent animation state.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use ap_core::{secs_between, AgentId, Waypoint};
use ap_paths::ActivityPath;

use crate::AgentProfile;

/// One agent's animation state.  Rebuilt from scratch on initialisation and
/// mutated every tick; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedAgent {
    pub profile:          Arc<AgentProfile>,
    pub current_position: Waypoint,
    /// `None` for agents placed at `static_position`.
    pub active_path:      Option<Arc<ActivityPath>>,
    /// Fraction of `active_path` covered, in `[0, 1]`.  Exactly `1.0` only
    /// straight after initial placement; the next tick rotates the path.
    pub progress:         f64,
    /// Metres per second.
    pub speed:            f64,
    pub static_position:  Option<Waypoint>,
}

impl AnimatedAgent {
    #[inline]
    pub fn id(&self) -> &AgentId {
        &self.profile.id
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.active_path.is_none()
    }

    /// Advance by `dt` seconds.  `paths` is this agent's path list in the
    /// animator's index snapshot.  Returns `true` if the position changed.
    pub(crate) fn step(&mut self, dt: f64, paths: &[Arc<ActivityPath>]) -> bool {
        let before = self.current_position;

        match self.active_path.as_ref().map(Arc::clone) {
            None => {
                if let Some(spot) = self.static_position {
                    self.current_position = spot;
                }
            }
            Some(path) => {
                let length = path.length_m();
                // Zero-length paths complete immediately.
                self.progress = if length > 0.0 {
                    self.progress + self.speed * dt / length
                } else {
                    1.0
                };

                if self.progress >= 1.0 {
                    let next = next_path(&path, paths);
                    self.progress = 0.0;
                    self.current_position = next.route.first();
                    self.active_path = Some(next);
                } else {
                    self.current_position = path.position_at(self.progress);
                }
            }
        }

        self.current_position != before
    }
}

/// Round-robin successor of `current` in `paths`.  A path no longer in the
/// list is followed by the first one; an empty list restarts `current`.
fn next_path(current: &Arc<ActivityPath>, paths: &[Arc<ActivityPath>]) -> Arc<ActivityPath> {
    if paths.is_empty() {
        return Arc::clone(current);
    }
    let next = paths
        .iter()
        .position(|p| p.id == current.id)
        .map_or(0, |i| (i + 1) % paths.len());
    Arc::clone(&paths[next])
}

// ── Initial placement ─────────────────────────────────────────────────────────

/// Pick the path an agent starts on and how far along it is at `now`.
///
/// Precedence:
/// 1. a path whose `[start, end]` window contains `now`: elapsed / duration;
/// 2. a path with only a start, begun within `assumed_secs`:
///    elapsed / `assumed_secs`;
/// 3. the first path at `fallback_progress`.
///
/// Progress is clamped to `[0, 1]`.  `None` only if `paths` is empty.
pub fn initial_progress(
    paths:             &[Arc<ActivityPath>],
    now:               DateTime<Utc>,
    fallback_progress: f64,
    assumed_secs:      f64,
) -> Option<(Arc<ActivityPath>, f64)> {
    let in_window = paths.iter().find(|p| p.window_contains(now)).and_then(|p| {
        let start = p.start_time?;
        let duration = p.duration_secs()?;
        let progress = if duration > 0.0 { secs_between(start, now) / duration } else { 1.0 };
        Some((Arc::clone(p), clamp_unit(progress)))
    });
    if in_window.is_some() {
        return in_window;
    }

    if assumed_secs > 0.0 {
        let recent = paths.iter().find_map(|p| {
            let start = p.start_time.filter(|_| p.is_open_ended())?;
            let elapsed = secs_between(start, now);
            (0.0..=assumed_secs)
                .contains(&elapsed)
                .then(|| (Arc::clone(p), clamp_unit(elapsed / assumed_secs)))
        });
        if recent.is_some() {
            return recent;
        }
    }

    paths.first().map(|p| (Arc::clone(p), clamp_unit(fallback_progress)))
}

fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}
