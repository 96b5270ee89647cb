//! Critical Path Method over a task dependency graph.
//!
//! Forward pass, backward pass, slack and the zero-slack critical path, plus
//! an optional cache for callers that recompute on every edit.

mod cache;
mod calculation;
mod types;

pub use cache::{snapshot_key, ScheduleCache};
pub use calculation::{calculate_critical_path, compute_schedule};
pub use types::{CriticalPathSummary, ScheduleResult, TaskTiming};
