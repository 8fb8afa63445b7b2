//! Per-agent seeded values and the speed model.
//!
//! # Draw order
//!
//! Every seeded value comes from one `SeededRandom(agent_id)` stream, drawn in
//! a fixed order:
//!
//! | Draw | Used for                               |
//! |------|----------------------------------------|
//! | 1    | base speed                             |
//! | 2    | fallback initial progress              |
//! | 3    | idle latitude offset                   |
//! | 4    | idle longitude offset                  |
//!
//! Changing the order changes every agent's behaviour on every client, so new
//! draws must be appended.

use serde::Deserialize;

use ap_core::{AgentId, SeededRandom, Waypoint};

// ── AgentSeeds ────────────────────────────────────────────────────────────────

/// The seeded draws for one agent, each in `[0, 1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentSeeds {
    pub speed:    f64,
    pub progress: f64,
    pub lat:      f64,
    pub lng:      f64,
}

impl AgentSeeds {
    pub fn derive(agent: &AgentId) -> Self {
        let mut rng = SeededRandom::new(agent.as_str());
        Self {
            speed:    rng.next_f64(),
            progress: rng.next_f64(),
            lat:      rng.next_f64(),
            lng:      rng.next_f64(),
        }
    }

    /// `base` moved by up to `spread_deg` on each axis.
    pub fn scatter(&self, base: Waypoint, spread_deg: f64) -> Waypoint {
        base.offset((self.lat * 2.0 - 1.0) * spread_deg, (self.lng * 2.0 - 1.0) * spread_deg)
    }
}

// ── Categories ────────────────────────────────────────────────────────────────

/// Coarse grouping of free-form activity categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    /// Moving between places: `goto_*`, `transport`, `travel`, `deliver*`.
    Transport,
    /// Working on site: anything mentioning `work` that is not travel.
    Work,
    Other,
}

impl CategoryKind {
    /// Case-insensitive classification.  Travel wins over work, so
    /// `goto_work` is `Transport`.
    pub fn classify(category: &str) -> Self {
        let c = category.to_ascii_lowercase();
        if ["goto", "transport", "travel", "deliver"].iter().any(|k| c.contains(k)) {
            CategoryKind::Transport
        } else if c.contains("work") {
            CategoryKind::Work
        } else {
            CategoryKind::Other
        }
    }

    /// Marker colour for the renderer.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            CategoryKind::Transport => [0x3b, 0x82, 0xf6],
            CategoryKind::Work      => [0xf5, 0x9e, 0x0b],
            CategoryKind::Other     => [0x9c, 0xa3, 0xaf],
        }
    }
}

// ── SpeedModel ────────────────────────────────────────────────────────────────

/// Pluggable per-agent speed, in metres per second.
///
/// Called once when an agent is (re)built, with the category of its initial
/// path (empty for agents without one).  Must be deterministic in its inputs
/// so every client animates an agent at the same pace.
pub trait SpeedModel: Send + Sync + 'static {
    fn speed_for(&self, agent: &AgentId, category: &str) -> f64;
}

/// Speed bounds and category multipliers.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Inclusive lower bound of the seeded base speed, m/s.  Default: 1.
    pub min_mps:          f64,
    /// Exclusive upper bound of the seeded base speed, m/s.  Default: 5.
    pub max_mps:          f64,
    /// Default: 0.7.
    pub work_factor:      f64,
    /// Default: 1.5.
    pub transport_factor: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self { min_mps: 1.0, max_mps: 5.0, work_factor: 0.7, transport_factor: 1.5 }
    }
}

/// The default model: seeded base speed in `[min, max)`, scaled by
/// [`CategoryKind`].
#[derive(Clone, Debug, Default)]
pub struct CategorySpeed {
    config: SpeedConfig,
}

impl CategorySpeed {
    pub fn new(config: SpeedConfig) -> Self {
        Self { config }
    }

    pub fn base_speed(&self, agent: &AgentId) -> f64 {
        let span = self.config.max_mps - self.config.min_mps;
        self.config.min_mps + AgentSeeds::derive(agent).speed * span
    }

    pub fn factor(&self, kind: CategoryKind) -> f64 {
        match kind {
            CategoryKind::Transport => self.config.transport_factor,
            CategoryKind::Work      => self.config.work_factor,
            CategoryKind::Other     => 1.0,
        }
    }
}

impl SpeedModel for CategorySpeed {
    fn speed_for(&self, agent: &AgentId, category: &str) -> f64 {
        self.base_speed(agent) * self.factor(CategoryKind::classify(category))
    }
}

/// Every agent moves at the same speed.  Handy for replays and tests where
/// timing must be exact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantSpeed(pub f64);

impl SpeedModel for ConstantSpeed {
    fn speed_for(&self, _agent: &AgentId, _category: &str) -> f64 {
        self.0
    }
}
