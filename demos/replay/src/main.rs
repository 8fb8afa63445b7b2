//! replay: headless run of the activity-path animation stack.
//!
//! Fetches activity paths through a TTL-cached `PathStore`, places every
//! roster agent where it should be right now, and drives the animator's
//! frame loop from a tokio interval standing in for a display refresh.
//! Positions are logged as the loop runs and printed at the end.
//!
//! ```text
//! replay [config.json]
//! RUST_LOG=debug replay        # also shows skipped records and pathless agents
//! ```

mod config;
mod source;

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ap_anim::{load_roster_csv, load_roster_reader, AgentAnimator, AgentProfile, ManualScheduler};
use ap_paths::{FetchOptions, PathStore};

use config::ReplayConfig;
use source::{ReplaySource, BUILT_IN_ROSTER};

/// Host refresh period: a 120 Hz display, so the 60 fps throttle has work
/// to do.
const DISPLAY_PERIOD: Duration = Duration::from_micros(8_333);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // 2. Configuration.
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ReplayConfig::load(config_path.as_deref())?;
    info!(
        ttl_secs   = config.store.ttl_secs,
        target_fps = config.animator.target_fps,
        run_secs   = config.run_secs,
        "configuration loaded"
    );

    // 3. Path store.
    let source = ReplaySource::from_config(&config, Utc::now())?;
    info!(source = %source.describe(), "activity source ready");
    let store = PathStore::new(source, config.store.clone());
    let opts = FetchOptions { ongoing_only: config.ongoing_only, ..FetchOptions::default() };
    let index = store.fetch_paths(opts).await;
    if let Some(e) = store.last_error() {
        warn!(error = %e, "initial fetch failed; agents with a position will idle");
    }
    if let Some(report) = store.last_report() {
        info!(
            received = report.received,
            accepted = report.accepted,
            skipped  = report.skipped,
            "paths ingested"
        );
    }

    // 4. Roster and initial placement.
    let roster: Vec<Arc<AgentProfile>> = match &config.roster_path {
        Some(path) => load_roster_csv(path)?,
        None => load_roster_reader(Cursor::new(BUILT_IN_ROSTER))?,
    }
    .into_iter()
    .map(Arc::new)
    .collect();

    let mut animator = AgentAnimator::new(config.animator.clone());
    animator.initialize(roster.iter().cloned(), index, Utc::now());

    // 5. Frame loop.
    let host = ManualScheduler::new();
    let updates = Arc::new(AtomicUsize::new(0));
    let report_every = config.report_every.max(1);
    {
        let updates = Arc::clone(&updates);
        animator.start_loop(
            Box::new(host.clone()),
            Box::new(move |agents, _stopper| {
                let n = updates.fetch_add(1, Ordering::Relaxed) + 1;
                if n % report_every == 0 {
                    info!(update = n, agents = agents.len(), "agents moved");
                }
            }),
        );
    }

    let started = Instant::now();
    let deadline = started + Duration::from_secs_f64(config.run_secs.max(0.0));
    let mut display = tokio::time::interval(DISPLAY_PERIOD);
    display.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut refresh = tokio::time::interval(Duration::from_secs(config.refresh_secs.max(1)));
    refresh.tick().await;

    loop {
        tokio::select! {
            now = display.tick() => {
                if now >= deadline {
                    break;
                }
                if let Some(handle) = host.next_due() {
                    animator.on_frame(handle, now - started);
                }
            }
            _ = refresh.tick() => {
                animator.set_path_index(store.fetch_paths(opts).await);
            }
        }
    }
    animator.stop_loop();

    // 6. Summary.
    info!(updates = updates.load(Ordering::Relaxed), "replay finished");
    let mut agents: Vec<_> = animator.agents().values().collect();
    agents.sort_by(|a, b| a.id().cmp(b.id()));
    for agent in agents {
        let activity = agent
            .active_path
            .as_ref()
            .map_or("idle".to_owned(), |p| format!("{} {:.0}%", p.id, agent.progress * 100.0));
        println!(
            "{:<12} {:<16} {}  {}",
            agent.id(),
            agent.profile.display_name(),
            agent.current_position,
            activity
        );
    }

    animator.dispose();
    Ok(())
}
