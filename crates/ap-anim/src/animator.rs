//! `AgentAnimator`: owns the live agent map and drives it frame by frame.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use ap_core::{AgentId, Point2, Waypoint};
use ap_paths::{ActivityPath, PathIndex};
use ap_spatial::HoverIndex;

use crate::agent::initial_progress;
use crate::scheduler::{FrameHandle, FrameOutcome, FrameScheduler, LoopStopper};
use crate::speed::{AgentSeeds, CategorySpeed, SpeedConfig, SpeedModel};
use crate::{AgentProfile, AnimatedAgent};

/// The live agent map, keyed by agent id.
#[cfg(not(feature = "fx-hash"))]
pub type AgentMap = std::collections::HashMap<AgentId, AnimatedAgent>;
/// The live agent map, keyed by agent id.
#[cfg(feature = "fx-hash")]
pub type AgentMap = rustc_hash::FxHashMap<AgentId, AnimatedAgent>;

/// Callback run after a tick that moved at least one agent.
pub type UpdateFn = Box<dyn FnMut(&AgentMap, &LoopStopper) + Send>;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Stand-in duration for paths with a start but no end, in seconds.
    /// Such a path counts as current for this long after it starts.
    /// Default: 3600.
    pub assumed_activity_duration_secs: f64,

    /// Half-width, in degrees, of the square that pathless agents are
    /// scattered in around their base position.  Default: 0.0002.
    pub idle_spread_deg: f64,

    /// Upper bound on ticks per second.  `0` disables throttling.
    /// Default: 60.
    pub target_fps: u32,

    pub speed: SpeedConfig,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            assumed_activity_duration_secs: 3600.0,
            idle_spread_deg: 0.0002,
            target_fps: 60,
            speed: SpeedConfig::default(),
        }
    }
}

impl AnimatorConfig {
    /// Shortest gap between two ticks.
    pub fn min_frame_interval(&self) -> Duration {
        match self.target_fps {
            0 => Duration::ZERO,
            fps => Duration::from_secs(1) / fps,
        }
    }
}

// ── Frame loop state ──────────────────────────────────────────────────────────

struct FrameLoop {
    scheduler: Box<dyn FrameScheduler>,
    on_update: UpdateFn,
    stopper:   LoopStopper,
    /// The one frame this loop is waiting for.
    pending:   Option<FrameHandle>,
    /// Timestamp of the last tick (or the baseline frame).
    last_tick: Option<Duration>,
}

impl FrameLoop {
    fn rearm(&mut self) {
        self.pending = Some(self.scheduler.request_frame());
    }

    fn shut_down(mut self) {
        self.stopper.stop();
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

// ── AgentAnimator ─────────────────────────────────────────────────────────────

/// Owns every [`AnimatedAgent`] and the path-index snapshot they animate
/// against.
///
/// # Type parameter
///
/// `M` picks the [`SpeedModel`]; the default [`CategorySpeed`] derives a
/// seeded speed per agent and scales it by activity category.
///
/// # Threading
///
/// Single owner.  A tick uses one `dt` and one index snapshot for every
/// agent; [`set_path_index`](Self::set_path_index) takes effect from the
/// next tick.
pub struct AgentAnimator<M: SpeedModel = CategorySpeed> {
    config:     AnimatorConfig,
    speed:      M,
    index:      Arc<PathIndex>,
    agents:     AgentMap,
    frame_loop: Option<FrameLoop>,
}

impl AgentAnimator<CategorySpeed> {
    pub fn new(config: AnimatorConfig) -> Self {
        let speed = CategorySpeed::new(config.speed.clone());
        Self::with_speed_model(config, speed)
    }
}

impl Default for AgentAnimator<CategorySpeed> {
    fn default() -> Self {
        Self::new(AnimatorConfig::default())
    }
}

impl<M: SpeedModel> AgentAnimator<M> {
    pub fn with_speed_model(config: AnimatorConfig, speed: M) -> Self {
        Self {
            config,
            speed,
            index: Arc::new(PathIndex::new()),
            agents: AgentMap::default(),
            frame_loop: None,
        }
    }

    // ── Initialisation ────────────────────────────────────────────────────

    /// Rebuild the live map from `roster` × `index`, placing every agent
    /// where it should be at `now`.  Any previous agents are discarded.
    pub fn initialize<I>(&mut self, roster: I, index: Arc<PathIndex>, now: DateTime<Utc>) -> &AgentMap
    where
        I: IntoIterator<Item = Arc<AgentProfile>>,
    {
        self.agents.clear();
        self.index = index;

        let (mut moving, mut idle, mut hidden) = (0usize, 0usize, 0usize);
        for profile in roster {
            match self.build_agent(profile, now) {
                Some(agent) => {
                    if agent.is_static() {
                        idle += 1;
                    } else {
                        moving += 1;
                    }
                    self.agents.insert(agent.id().clone(), agent);
                }
                None => hidden += 1,
            }
        }

        info!(moving, idle, hidden, "animator initialised");
        &self.agents
    }

    /// Add or replace one agent, placed as in [`initialize`](Self::initialize).
    /// Returns `false` if the agent has neither a path nor a position.
    pub fn add_agent(&mut self, profile: Arc<AgentProfile>, now: DateTime<Utc>) -> bool {
        let id = profile.id.clone();
        match self.build_agent(profile, now) {
            Some(agent) => {
                self.agents.insert(id, agent);
                true
            }
            None => {
                self.agents.remove(&id);
                false
            }
        }
    }

    fn build_agent(&self, profile: Arc<AgentProfile>, now: DateTime<Utc>) -> Option<AnimatedAgent> {
        let seeds = AgentSeeds::derive(&profile.id);
        let paths = self.index.paths_for(profile.id.as_str());

        if let Some((path, progress)) = initial_progress(
            paths,
            now,
            seeds.progress,
            self.config.assumed_activity_duration_secs,
        ) {
            let speed = self.speed.speed_for(&profile.id, &path.category);
            return Some(AnimatedAgent {
                current_position: path.position_at(progress),
                active_path: Some(path),
                progress,
                speed,
                static_position: None,
                profile,
            });
        }

        let Some(base) = profile.position else {
            debug!(agent = %profile.id, "no path and no position; not animated");
            return None;
        };
        let spot = seeds.scatter(base, self.config.idle_spread_deg);
        Some(AnimatedAgent {
            speed: self.speed.speed_for(&profile.id, ""),
            current_position: spot,
            active_path: None,
            progress: 0.0,
            static_position: Some(spot),
            profile,
        })
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance every agent by `dt` seconds and return how many moved.
    ///
    /// A negative or non-finite `dt` is treated as zero.
    pub fn tick(&mut self, dt: f64) -> usize {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let index = &self.index;

        #[cfg(not(feature = "parallel"))]
        {
            self.agents
                .values_mut()
                .map(|agent| {
                    let paths = index.paths_for(agent.id().as_str());
                    agent.step(dt, paths)
                })
                .filter(|&moved| moved)
                .count()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.agents
                .par_iter_mut()
                .map(|(id, agent)| agent.step(dt, index.paths_for(id.as_str())))
                .filter(|&moved| moved)
                .count()
        }
    }

    // ── Frame loop ────────────────────────────────────────────────────────

    /// Start driving [`tick`](Self::tick) from `scheduler`.  A loop that is
    /// already running is stopped first.
    pub fn start_loop(&mut self, scheduler: Box<dyn FrameScheduler>, on_update: UpdateFn) {
        self.stop_loop();
        let mut frame_loop = FrameLoop {
            scheduler,
            on_update,
            stopper: LoopStopper::default(),
            pending: None,
            last_tick: None,
        };
        frame_loop.rearm();
        self.frame_loop = Some(frame_loop);
    }

    /// Handle a frame the scheduler fired at `timestamp` (any monotonic
    /// origin).
    ///
    /// The first frame only sets the baseline.  Frames closer than
    /// [`AnimatorConfig::min_frame_interval`] to the last tick are skipped
    /// and re-requested.  Otherwise agents advance by the real time since
    /// the last tick and the update callback runs if any of them moved.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp: Duration) -> FrameOutcome {
        let Some(mut frame_loop) = self.frame_loop.take() else {
            return FrameOutcome::Ignored;
        };
        if frame_loop.stopper.is_stopped() {
            frame_loop.shut_down();
            return FrameOutcome::Ignored;
        }
        if frame_loop.pending != Some(handle) {
            self.frame_loop = Some(frame_loop);
            return FrameOutcome::Ignored;
        }
        frame_loop.pending = None;

        let elapsed = frame_loop
            .last_tick
            .and_then(|last| timestamp.checked_sub(last));
        let outcome = match elapsed {
            // Baseline, or the host clock went backwards.
            None => {
                frame_loop.last_tick = Some(timestamp);
                FrameOutcome::Skipped
            }
            Some(elapsed) if elapsed < self.config.min_frame_interval() => FrameOutcome::Skipped,
            Some(elapsed) => {
                frame_loop.last_tick = Some(timestamp);
                let changed = self.tick(elapsed.as_secs_f64());
                if changed > 0 {
                    (frame_loop.on_update)(&self.agents, &frame_loop.stopper);
                }
                FrameOutcome::Ticked { changed }
            }
        };

        if frame_loop.stopper.is_stopped() {
            frame_loop.shut_down();
        } else {
            frame_loop.rearm();
            self.frame_loop = Some(frame_loop);
        }
        outcome
    }

    /// Stop the loop and cancel its pending frame.  Safe to call at any
    /// time, including when no loop is running.
    pub fn stop_loop(&mut self) {
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.shut_down();
        }
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_some()
    }

    /// The frame the running loop waits for.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame_loop.as_ref().and_then(|l| l.pending)
    }

    // ── Accessors and mutators ────────────────────────────────────────────

    /// Owned copy of the live map.
    pub fn snapshot(&self) -> AgentMap {
        self.agents.clone()
    }

    pub fn agents(&self) -> &AgentMap {
        &self.agents
    }

    pub fn get(&self, agent: &str) -> Option<&AnimatedAgent> {
        self.agents.get(agent)
    }

    /// `agent`'s paths in the animator's index snapshot.
    pub fn paths_for(&self, agent: &str) -> &[Arc<ActivityPath>] {
        self.index.paths_for(agent)
    }

    pub fn path_index(&self) -> &Arc<PathIndex> {
        &self.index
    }

    /// Swap in a newer index.  Agents keep their current path and progress;
    /// the new lists apply from their next path change.
    pub fn set_path_index(&mut self, index: Arc<PathIndex>) {
        self.index = index;
    }

    pub fn remove_agent(&mut self, agent: &str) -> Option<AnimatedAgent> {
        self.agents.remove(agent)
    }

    pub fn clear(&mut self) {
        self.agents.clear();
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Stop the loop and drop every agent.
    pub fn dispose(&mut self) {
        self.stop_loop();
        self.clear();
    }

    /// Hit-testing index over current positions, projected by `project`.
    pub fn hover_index<F>(&self, project: F) -> HoverIndex
    where
        F: Fn(Waypoint) -> Point2,
    {
        HoverIndex::build(
            self.agents
                .values()
                .map(|a| (a.id().clone(), project(a.current_position))),
        )
    }
}

impl<M: SpeedModel> Drop for AgentAnimator<M> {
    fn drop(&mut self) {
        self.stop_loop();
    }
}
