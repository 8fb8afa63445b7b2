//! `ap-anim`: live agent animation over activity paths.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`roster`]    | `AgentProfile`, CSV roster loader                             |
//! | [`speed`]     | `AgentSeeds`, `SpeedModel`, `CategorySpeed`, `CategoryKind`   |
//! | [`agent`]     | `AnimatedAgent`, initial path and progress selection          |
//! | [`animator`]  | `AgentAnimator`, `AnimatorConfig`, `AgentMap`                 |
//! | [`scheduler`] | `FrameScheduler`, `ManualScheduler`, `LoopStopper`            |
//! | [`error`]     | `AnimError`, `AnimResult`                                     |
//!
//! # Frame lifecycle
//!
//! ```text
//! start_loop(scheduler, on_update)   → request_frame()
//! host fires frame                   → on_frame(handle, timestamp)
//!   stale handle / stopped           → ignored
//!   first frame / too soon           → skipped, request_frame()
//!   otherwise                        → tick(real dt)
//!                                      on_update(&agents, &stopper) if anything moved
//!                                      request_frame() unless stopped
//! stop_loop()                        → cancel_frame(pending)
//! ```

pub mod agent;
pub mod animator;
pub mod error;
pub mod roster;
pub mod scheduler;
pub mod speed;

#[cfg(test)]
mod tests;

pub use agent::{initial_progress, AnimatedAgent};
pub use animator::{AgentAnimator, AgentMap, AnimatorConfig, UpdateFn};
pub use error::{AnimError, AnimResult};
pub use roster::{load_roster_csv, load_roster_reader, AgentProfile};
pub use scheduler::{FrameHandle, FrameOutcome, FrameScheduler, LoopStopper, ManualScheduler};
pub use speed::{AgentSeeds, CategoryKind, CategorySpeed, ConstantSpeed, SpeedConfig, SpeedModel};
