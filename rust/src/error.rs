//! Error types for schedule computation.

use thiserror::Error;

/// Errors that can occur while computing a schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The dependency graph is cyclic; timings would be meaningless.
    #[error("Circular dependency detected involving tasks: {}", .task_ids.join(", "))]
    CycleDetected { task_ids: Vec<String> },
    #[error("Task not found: {0}")]
    UnknownTask(String),
}
