//! Unit tests for ap-anim.

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{json, Value};

    use ap_paths::{build_index, ActivityPath, PathIndex};

    /// ~111 m due north.
    pub const NORTH: [(f64, f64); 2] = [(45.000, 12.000), (45.001, 12.000)];
    /// ~79 m due east, starting where `NORTH` ends.
    pub const EAST: [(f64, f64); 2] = [(45.001, 12.000), (45.001, 12.001)];
    /// Zero length.
    pub const STILL: [(f64, f64); 2] = [(45.002, 12.002), (45.002, 12.002)];

    pub fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    pub fn rec(
        id: &str,
        agent: &str,
        points: &[(f64, f64)],
        start: Option<&str>,
        end: Option<&str>,
    ) -> Value {
        let path: Vec<Value> = points.iter().map(|&(lat, lng)| json!({ "lat": lat, "lng": lng })).collect();
        json!({
            "activityId": id,
            "citizenId": agent,
            "path": path,
            "type": "goto_work",
            "startDate": start,
            "endDate": end,
        })
    }

    pub fn index_of(records: Vec<Value>) -> Arc<PathIndex> {
        Arc::new(build_index(records, None).0)
    }

    pub fn paths(records: Vec<Value>, agent: &str) -> Vec<Arc<ActivityPath>> {
        index_of(records).paths_for(agent).to_vec()
    }
}

// ── Seeds and speed ───────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use ap_core::{AgentId, Waypoint};

    use crate::{AgentSeeds, CategoryKind, CategorySpeed, SpeedConfig, SpeedModel};

    #[test]
    fn seeds_are_stable_and_in_range() {
        let id = AgentId::from("marco_polo");
        let a = AgentSeeds::derive(&id);
        assert_eq!(a, AgentSeeds::derive(&id));
        for v in [a.speed, a.progress, a.lat, a.lng] {
            assert!((0.0..1.0).contains(&v), "{v}");
        }
        assert_ne!(a, AgentSeeds::derive(&AgentId::from("elena_dandolo")));
    }

    #[test]
    fn classify_categories() {
        assert_eq!(CategoryKind::classify("goto_work"), CategoryKind::Transport);
        assert_eq!(CategoryKind::classify("deliver_resource_batch"), CategoryKind::Transport);
        assert_eq!(CategoryKind::classify("Travel"), CategoryKind::Transport);
        assert_eq!(CategoryKind::classify("work"), CategoryKind::Work);
        assert_eq!(CategoryKind::classify("WORK_SHIFT"), CategoryKind::Work);
        assert_eq!(CategoryKind::classify("fishing"), CategoryKind::Other);
        assert_eq!(CategoryKind::classify(""), CategoryKind::Other);
    }

    #[test]
    fn category_speed_scales_seeded_base() {
        let model = CategorySpeed::default();
        let id = AgentId::from("marco_polo");
        let base = model.base_speed(&id);
        assert!((1.0..5.0).contains(&base), "{base}");
        assert_eq!(model.speed_for(&id, "idle"), base);
        assert!((model.speed_for(&id, "work") - base * 0.7).abs() < 1e-12);
        assert!((model.speed_for(&id, "goto_home") - base * 1.5).abs() < 1e-12);
    }

    #[test]
    fn speed_bounds_are_configurable() {
        let model = CategorySpeed::new(SpeedConfig { min_mps: 2.0, max_mps: 2.0, ..SpeedConfig::default() });
        assert_eq!(model.speed_for(&AgentId::from("x"), "fishing"), 2.0);
    }

    #[test]
    fn scatter_stays_within_spread() {
        let base = Waypoint::new(45.4371, 12.3326);
        for name in ["a", "b", "c", "marco_polo", "ctz_4412"] {
            let spot = AgentSeeds::derive(&AgentId::from(name)).scatter(base, 0.0002);
            assert!(spot.within_bbox(base, 0.0002), "{name}: {spot}");
        }
    }
}

// ── Roster ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod roster {
    use std::io::Cursor;

    use crate::{load_roster_reader, AgentProfile, AnimError};

    #[test]
    fn loads_rows() {
        let csv = "id,name,lat,lng,social_class\n\
                   ctz_1,Marco Polo,45.438,12.3358,Cittadini\n\
                   ctz_2,,,,\n";
        let roster = load_roster_reader(Cursor::new(csv)).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].display_name(), "Marco Polo");
        assert_eq!(roster[0].position.map(|p| p.lat), Some(45.438));
        assert_eq!(roster[0].social_class.as_deref(), Some("Cittadini"));
        assert_eq!(roster[1].position, None);
        assert_eq!(roster[1].display_name(), "ctz_2");
    }

    #[test]
    fn empty_id_is_an_error() {
        let csv = "id,name,lat,lng,social_class\n ,x,1,2,\n";
        assert!(matches!(load_roster_reader(Cursor::new(csv)), Err(AnimError::Roster(_))));
    }

    #[test]
    fn bad_number_is_an_error() {
        let csv = "id,name,lat,lng,social_class\nctz_1,x,north,2,\n";
        assert!(matches!(load_roster_reader(Cursor::new(csv)), Err(AnimError::Roster(_))));
    }

    #[test]
    fn builder() {
        let p = AgentProfile::new("ctz_9").with_name("Doge");
        assert_eq!(p.display_name(), "Doge");
        assert!(p.position.is_none());
    }
}

// ── Initial path selection ────────────────────────────────────────────────────

#[cfg(test)]
mod initial {
    use super::fixtures::{noon, paths, rec, EAST, NORTH};
    use crate::initial_progress;

    const HOUR: f64 = 3600.0;

    #[test]
    fn window_containing_now_wins() {
        let ps = paths(
            vec![
                rec("old", "w", &NORTH, Some("2025-06-01T11:50:00Z"), None),
                rec("now", "w", &EAST, Some("2025-06-01T11:30:00Z"), Some("2025-06-01T12:30:00Z")),
            ],
            "w",
        );
        let (path, progress) = initial_progress(&ps, noon(), 0.9, HOUR).unwrap();
        assert_eq!(path.id.as_str(), "now");
        assert!((progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn recent_open_ended_path_uses_assumed_duration() {
        let ps = paths(
            vec![
                rec("done", "w", &NORTH, Some("2025-06-01T09:00:00Z"), Some("2025-06-01T10:00:00Z")),
                rec("open", "w", &EAST, Some("2025-06-01T11:45:00Z"), None),
            ],
            "w",
        );
        let (path, progress) = initial_progress(&ps, noon(), 0.9, HOUR).unwrap();
        assert_eq!(path.id.as_str(), "open");
        assert!((progress - 0.25).abs() < 1e-9);
    }

    #[test]
    fn stale_or_future_paths_fall_back_to_first() {
        let ps = paths(
            vec![
                rec("stale", "w", &NORTH, Some("2025-06-01T09:00:00Z"), None),
                rec("later", "w", &EAST, Some("2025-06-01T15:00:00Z"), None),
            ],
            "w",
        );
        let (path, progress) = initial_progress(&ps, noon(), 0.37, HOUR).unwrap();
        assert_eq!(path.id.as_str(), "stale");
        assert_eq!(progress, 0.37);
    }

    #[test]
    fn assumed_duration_is_configurable() {
        let ps = paths(vec![rec("open", "w", &NORTH, Some("2025-06-01T11:00:00Z"), None)], "w");
        let (_, progress) = initial_progress(&ps, noon(), 0.1, 2.0 * HOUR).unwrap();
        assert!((progress - 0.5).abs() < 1e-9);
        // With the default hour it is exactly at the edge: still current, complete.
        let (_, progress) = initial_progress(&ps, noon(), 0.1, HOUR).unwrap();
        assert_eq!(progress, 1.0);
    }

    #[test]
    fn instantaneous_window() {
        let ps = paths(
            vec![rec("blip", "w", &NORTH, Some("2025-06-01T12:00:00Z"), Some("2025-06-01T12:00:00Z"))],
            "w",
        );
        let (_, progress) = initial_progress(&ps, noon(), 0.1, HOUR).unwrap();
        assert_eq!(progress, 1.0);
    }

    #[test]
    fn fallback_is_clamped_and_empty_is_none() {
        let ps = paths(vec![rec("a", "w", &NORTH, None, None)], "w");
        assert_eq!(initial_progress(&ps, noon(), 7.0, HOUR).unwrap().1, 1.0);
        assert!(initial_progress(&[], noon(), 0.5, HOUR).is_none());
    }
}

// ── Per-agent step ────────────────────────────────────────────────────────────

#[cfg(test)]
mod step {
    use std::sync::Arc;

    use ap_core::Waypoint;
    use ap_paths::ActivityPath;

    use super::fixtures::{paths, rec, EAST, NORTH, STILL};
    use crate::{AgentProfile, AnimatedAgent};

    fn walker(path: &Arc<ActivityPath>, progress: f64, speed: f64) -> AnimatedAgent {
        AnimatedAgent {
            profile: Arc::new(AgentProfile::new("w")),
            current_position: path.position_at(progress),
            active_path: Some(Arc::clone(path)),
            progress,
            speed,
            static_position: None,
        }
    }

    fn two_paths() -> Vec<Arc<ActivityPath>> {
        paths(vec![rec("a", "w", &NORTH, None, None), rec("b", "w", &EAST, None, None)], "w")
    }

    #[test]
    fn advances_by_speed_over_length() {
        let ps = two_paths();
        let mut agent = walker(&ps[0], 0.0, 10.0);
        assert!(agent.step(1.0, &ps));
        let expected = 10.0 / ps[0].length_m();
        assert!((agent.progress - expected).abs() < 1e-12);
        assert_eq!(agent.current_position, ps[0].position_at(expected));
    }

    #[test]
    fn completion_rotates_to_next_path() {
        let ps = two_paths();
        let mut agent = walker(&ps[0], 0.999, 5.0);
        assert!(agent.step(10.0, &ps));
        assert_eq!(agent.active_path.as_ref().map(|p| p.id.as_str()), Some("b"));
        assert_eq!(agent.progress, 0.0);
        assert_eq!(agent.current_position, Waypoint::new(EAST[0].0, EAST[0].1));
    }

    #[test]
    fn last_path_wraps_to_first() {
        let ps = two_paths();
        let mut agent = walker(&ps[1], 0.99, 100.0);
        agent.step(1.0, &ps);
        assert_eq!(agent.active_path.as_ref().map(|p| p.id.as_str()), Some("a"));
    }

    #[test]
    fn single_path_restarts() {
        let ps = paths(vec![rec("a", "w", &NORTH, None, None)], "w");
        let mut agent = walker(&ps[0], 0.9, 100.0);
        assert!(agent.step(1.0, &ps));
        assert!(Arc::ptr_eq(agent.active_path.as_ref().unwrap(), &ps[0]));
        assert_eq!(agent.progress, 0.0);
        assert_eq!(agent.current_position, ps[0].route.first());
    }

    #[test]
    fn zero_length_path_completes_immediately() {
        let ps = paths(vec![rec("z", "w", &STILL, None, None), rec("a", "w", &NORTH, None, None)], "w");
        let mut agent = walker(&ps[0], 0.0, 1.0);
        agent.step(0.0, &ps);
        assert_eq!(agent.active_path.as_ref().map(|p| p.id.as_str()), Some("a"));
        assert!(agent.progress.is_finite());
    }

    #[test]
    fn path_missing_from_list_goes_to_first() {
        let ps = two_paths();
        let orphan = paths(vec![rec("gone", "w", &STILL, None, None)], "w");
        let mut agent = walker(&orphan[0], 0.5, 1.0);
        agent.step(1.0, &ps);
        assert_eq!(agent.active_path.as_ref().map(|p| p.id.as_str()), Some("a"));
    }

    #[test]
    fn empty_list_restarts_current() {
        let ps = two_paths();
        let mut agent = walker(&ps[1], 0.99, 100.0);
        agent.step(1.0, &[]);
        assert_eq!(agent.active_path.as_ref().map(|p| p.id.as_str()), Some("b"));
        assert_eq!(agent.progress, 0.0);
    }

    #[test]
    fn static_agent_snaps_once() {
        let spot = Waypoint::new(45.43, 12.33);
        let mut agent = AnimatedAgent {
            profile: Arc::new(AgentProfile::new("idle")),
            current_position: Waypoint::new(0.0, 0.0),
            active_path: None,
            progress: 0.0,
            speed: 3.0,
            static_position: Some(spot),
        };
        assert!(agent.step(0.016, &[]));
        assert_eq!(agent.current_position, spot);
        assert!(!agent.step(0.016, &[]));
    }
}

// ── AgentAnimator ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod animator {
    use std::sync::Arc;

    use ap_core::{AgentId, Point2, Waypoint};

    use super::fixtures::{index_of, noon, rec, EAST, NORTH};
    use crate::{AgentAnimator, AgentProfile, AgentSeeds, AnimatorConfig, CategorySpeed, ConstantSpeed, SpeedModel};

    fn roster() -> Vec<Arc<AgentProfile>> {
        vec![
            Arc::new(AgentProfile::new("walker")),
            Arc::new(AgentProfile::new("idle").with_position(Waypoint::new(45.43, 12.33))),
            Arc::new(AgentProfile::new("ghost")),
        ]
    }

    fn animator() -> AgentAnimator<ConstantSpeed> {
        let mut anim = AgentAnimator::with_speed_model(AnimatorConfig::default(), ConstantSpeed(5.0));
        let index = index_of(vec![
            rec("a", "walker", &NORTH, None, None),
            rec("b", "walker", &EAST, Some("2025-06-01T11:30:00Z"), Some("2025-06-01T12:30:00Z")),
        ]);
        anim.initialize(roster(), index, noon());
        anim
    }

    #[test]
    fn initialize_places_walkers_and_idlers() {
        let anim = animator();
        assert_eq!(anim.len(), 2);
        assert!(anim.get("ghost").is_none());

        let walker = anim.get("walker").unwrap();
        assert_eq!(walker.active_path.as_ref().map(|p| p.id.as_str()), Some("b"));
        assert!((walker.progress - 0.5).abs() < 1e-9);
        assert_eq!(walker.speed, 5.0);

        let idle = anim.get("idle").unwrap();
        assert!(idle.is_static());
        let spot = idle.static_position.unwrap();
        assert_eq!(idle.current_position, spot);
        assert!(spot.within_bbox(Waypoint::new(45.43, 12.33), 0.0002));
    }

    #[test]
    fn initialize_is_deterministic() {
        assert_eq!(animator().snapshot(), animator().snapshot());
    }

    #[test]
    fn fallback_progress_is_seeded() {
        let mut anim = AgentAnimator::with_speed_model(AnimatorConfig::default(), ConstantSpeed(1.0));
        let index = index_of(vec![rec("a", "drifter", &NORTH, None, None)]);
        anim.initialize([Arc::new(AgentProfile::new("drifter"))], index, noon());
        let expected = AgentSeeds::derive(&AgentId::from("drifter")).progress;
        assert_eq!(anim.get("drifter").unwrap().progress, expected);
    }

    #[test]
    fn default_speed_model_uses_initial_category() {
        let mut anim = AgentAnimator::new(AnimatorConfig::default());
        let index = index_of(vec![rec("a", "walker", &NORTH, None, None)]);
        anim.initialize([Arc::new(AgentProfile::new("walker"))], index, noon());
        let expected = CategorySpeed::default().speed_for(&AgentId::from("walker"), "goto_work");
        assert_eq!(anim.get("walker").unwrap().speed, expected);
    }

    #[test]
    fn tick_counts_moved_agents() {
        let mut anim = animator();
        assert_eq!(anim.tick(0.0), 0);
        assert_eq!(anim.tick(1.0), 1);
        assert_eq!(anim.tick(-3.0), 0);
        assert_eq!(anim.tick(f64::NAN), 0);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut anim = animator();
        let before = anim.snapshot();
        anim.tick(1.0);
        assert_ne!(before["walker"].current_position, anim.agents()["walker"].current_position);
    }

    #[test]
    fn add_remove_clear() {
        let mut anim = animator();
        assert!(!anim.add_agent(Arc::new(AgentProfile::new("nobody")), noon()));
        assert!(anim.add_agent(
            Arc::new(AgentProfile::new("late").with_position(Waypoint::new(45.0, 12.0))),
            noon()
        ));
        assert_eq!(anim.len(), 3);
        assert!(anim.remove_agent("late").is_some());
        assert!(anim.remove_agent("late").is_none());
        anim.clear();
        assert!(anim.is_empty());
    }

    #[test]
    fn new_index_applies_on_next_path_change() {
        let mut anim = animator();
        assert_eq!(anim.paths_for("walker").len(), 2);
        anim.set_path_index(index_of(vec![rec("c", "walker", &EAST, None, None)]));
        assert_eq!(anim.paths_for("walker").len(), 1);
        // Still on "b" until it completes.
        anim.tick(0.0);
        assert_eq!(anim.get("walker").unwrap().active_path.as_ref().unwrap().id.as_str(), "b");
        anim.tick(1_000.0);
        assert_eq!(anim.get("walker").unwrap().active_path.as_ref().unwrap().id.as_str(), "c");
    }

    #[test]
    fn completed_initial_placement_rotates_on_next_tick() {
        let mut anim = AgentAnimator::with_speed_model(AnimatorConfig::default(), ConstantSpeed(5.0));
        let index = index_of(vec![
            rec("a", "walker", &NORTH, Some("2025-06-01T11:00:00Z"), None),
            rec("b", "walker", &EAST, None, None),
        ]);
        anim.initialize([Arc::new(AgentProfile::new("walker"))], index, noon());
        let walker = anim.get("walker").unwrap();
        assert_eq!(walker.active_path.as_ref().unwrap().id.as_str(), "a");
        assert_eq!(walker.progress, 1.0);

        anim.tick(0.0);
        let walker = anim.get("walker").unwrap();
        assert_eq!(walker.active_path.as_ref().unwrap().id.as_str(), "b");
        assert_eq!(walker.progress, 0.0);
    }

    #[test]
    fn hover_index_over_projected_positions() {
        let anim = animator();
        let project = |w: Waypoint| Point2::new(w.lng * 10_000.0, w.lat * 10_000.0);
        let hover = anim.hover_index(project);
        assert_eq!(hover.len(), 2);
        let idle = anim.get("idle").unwrap().current_position;
        assert_eq!(hover.agent_at(project(idle), 1.0).map(AgentId::as_str), Some("idle"));
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod frame_loop {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use ap_core::Waypoint;

    use super::fixtures::{index_of, noon, rec, NORTH};
    use crate::{
        AgentAnimator, AgentProfile, AnimatorConfig, ConstantSpeed, FrameHandle, FrameOutcome,
        ManualScheduler,
    };

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn walking(config: AnimatorConfig) -> AgentAnimator<ConstantSpeed> {
        let mut anim = AgentAnimator::with_speed_model(config, ConstantSpeed(5.0));
        let index = index_of(vec![rec("a", "walker", &NORTH, None, None)]);
        anim.initialize([Arc::new(AgentProfile::new("walker"))], index, noon());
        anim
    }

    fn start(anim: &mut AgentAnimator<ConstantSpeed>, stop_after_first: bool) -> (ManualScheduler, Arc<AtomicUsize>) {
        let host = ManualScheduler::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        anim.start_loop(
            Box::new(host.clone()),
            Box::new(move |agents, stopper| {
                assert!(!agents.is_empty());
                seen.fetch_add(1, Ordering::SeqCst);
                if stop_after_first {
                    stopper.stop();
                }
            }),
        );
        (host, calls)
    }

    /// Fire the host's next due frame at `t`.
    fn fire(anim: &mut AgentAnimator<ConstantSpeed>, host: &ManualScheduler, t: Duration) -> FrameOutcome {
        let handle = host.next_due().expect("a frame should be pending");
        anim.on_frame(handle, t)
    }

    #[test]
    fn first_frame_is_baseline() {
        let mut anim = walking(AnimatorConfig::default());
        let (host, calls) = start(&mut anim, false);
        assert_eq!(host.pending().len(), 1);
        assert_eq!(fire(&mut anim, &host, ms(1_000)), FrameOutcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(host.pending().len(), 1);
    }

    #[test]
    fn early_frames_are_skipped_and_rerequested() {
        let mut anim = walking(AnimatorConfig::default());
        let (host, calls) = start(&mut anim, false);
        fire(&mut anim, &host, ms(0));
        assert_eq!(fire(&mut anim, &host, ms(5)), FrameOutcome::Skipped);
        assert_eq!(fire(&mut anim, &host, ms(10)), FrameOutcome::Skipped);
        assert_eq!(host.pending().len(), 1);
        assert_eq!(fire(&mut anim, &host, ms(20)), FrameOutcome::Ticked { changed: 1 });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delta_comes_from_frame_timestamps() {
        let mut anim = walking(AnimatorConfig::default());
        let before = anim.get("walker").unwrap().progress;
        let length = anim.paths_for("walker")[0].length_m();
        let (host, _) = start(&mut anim, false);
        fire(&mut anim, &host, ms(100));
        fire(&mut anim, &host, ms(105)); // skipped, must not reset the baseline
        fire(&mut anim, &host, ms(150));
        let after = anim.get("walker").unwrap().progress;
        let expected = before + 5.0 * 0.050 / length;
        assert!((after - expected).abs() < 1e-9, "{after} vs {expected}");
    }

    #[test]
    fn callback_only_when_something_moved() {
        let mut anim = AgentAnimator::with_speed_model(AnimatorConfig::default(), ConstantSpeed(5.0));
        anim.initialize(
            [Arc::new(AgentProfile::new("idle").with_position(Waypoint::new(45.0, 12.0)))],
            index_of(vec![]),
            noon(),
        );
        let (host, calls) = start(&mut anim, false);
        fire(&mut anim, &host, ms(0));
        assert_eq!(fire(&mut anim, &host, ms(20)), FrameOutcome::Ticked { changed: 0 });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stop_from_inside_callback() {
        let mut anim = walking(AnimatorConfig::default());
        let (host, calls) = start(&mut anim, true);
        fire(&mut anim, &host, ms(0));
        assert_eq!(fire(&mut anim, &host, ms(20)), FrameOutcome::Ticked { changed: 1 });
        assert!(!anim.is_running());
        assert!(host.pending().is_empty());
        assert_eq!(anim.on_frame(FrameHandle(1), ms(40)), FrameOutcome::Ignored);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut anim = walking(AnimatorConfig::default());
        let (host, _) = start(&mut anim, false);
        let pending = anim.pending_frame();
        assert_eq!(anim.on_frame(FrameHandle(999), ms(0)), FrameOutcome::Ignored);
        assert_eq!(anim.pending_frame(), pending);
        assert_eq!(host.pending(), pending.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn stop_loop_cancels_pending_frame() {
        let mut anim = walking(AnimatorConfig::default());
        let (host, _) = start(&mut anim, false);
        let pending = anim.pending_frame().unwrap();
        anim.stop_loop();
        anim.stop_loop();
        assert!(!anim.is_running());
        assert!(host.pending().is_empty());
        assert_eq!(host.cancelled(), vec![pending]);
        assert_eq!(anim.on_frame(pending, ms(100)), FrameOutcome::Ignored);
    }

    #[test]
    fn restarting_replaces_the_old_loop() {
        let mut anim = walking(AnimatorConfig::default());
        let (first, _) = start(&mut anim, false);
        let (second, _) = start(&mut anim, false);
        assert!(first.pending().is_empty());
        assert_eq!(second.pending().len(), 1);
    }

    #[test]
    fn unthrottled_when_fps_is_zero() {
        let mut anim = walking(AnimatorConfig { target_fps: 0, ..AnimatorConfig::default() });
        let (host, _) = start(&mut anim, false);
        fire(&mut anim, &host, ms(0));
        assert_eq!(fire(&mut anim, &host, ms(1)), FrameOutcome::Ticked { changed: 1 });
    }

    #[test]
    fn dispose_stops_and_clears() {
        let mut anim = walking(AnimatorConfig::default());
        let (host, _) = start(&mut anim, false);
        anim.dispose();
        assert!(anim.is_empty());
        assert!(host.pending().is_empty());
    }

    #[test]
    fn min_frame_interval() {
        assert_eq!(AnimatorConfig::default().min_frame_interval(), Duration::from_secs(1) / 60);
        let cfg: AnimatorConfig = serde_json::from_str(r#"{ "target_fps": 30 }"#).unwrap();
        assert_eq!(cfg.min_frame_interval(), Duration::from_secs(1) / 30);
        assert_eq!(cfg.assumed_activity_duration_secs, 3600.0);
    }
}
