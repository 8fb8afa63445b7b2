//! Host frame scheduling.
//!
//! The animator never owns a timer.  The host (a windowing event loop, a
//! tokio interval, a test) implements [`FrameScheduler`], and calls
//! [`AgentAnimator::on_frame`](crate::AgentAnimator::on_frame) with the
//! handle it issued and the frame's timestamp when the frame comes due.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Opaque id of one requested frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Host-provided "call me on the next frame" service.
///
/// A request is one-shot: after the frame fires the animator asks again.
/// `cancel_frame` on a handle that already fired or was never issued must be
/// a no-op.
pub trait FrameScheduler: Send {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

// ── ManualScheduler ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ManualState {
    next_id:   u64,
    pending:   Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

/// A scheduler that only records requests.  Clones share state, so a
/// headless host keeps one clone to see which frames are due and hands the
/// other to the animator.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding requests, oldest first.
    pub fn pending(&self) -> Vec<FrameHandle> {
        self.lock().pending.clone()
    }

    /// Remove and return the oldest outstanding request.
    pub fn next_due(&self) -> Option<FrameHandle> {
        let mut state = self.lock();
        (!state.pending.is_empty()).then(|| state.pending.remove(0))
    }

    /// Handles cancelled while still pending.
    pub fn cancelled(&self) -> Vec<FrameHandle> {
        self.lock().cancelled.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut state = self.lock();
        state.next_id += 1;
        let handle = FrameHandle(state.next_id);
        state.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut state = self.lock();
        if let Some(i) = state.pending.iter().position(|h| *h == handle) {
            state.pending.remove(i);
            state.cancelled.push(handle);
        }
    }
}

// ── LoopStopper ───────────────────────────────────────────────────────────────

/// Stops a running frame loop.  Passed to the update callback so the loop
/// can be stopped from inside it; clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct LoopStopper(Arc<AtomicBool>);

impl LoopStopper {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What [`AgentAnimator::on_frame`](crate::AgentAnimator::on_frame) did with
/// a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No loop, loop stopped, or not the handle currently awaited.
    Ignored,
    /// Baseline frame or too soon after the previous tick; re-requested.
    Skipped,
    /// Agents were advanced; `changed` of them moved.
    Ticked { changed: usize },
}
