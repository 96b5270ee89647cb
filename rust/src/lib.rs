//! Critical Path Method scheduling for task dependency graphs.
//!
//! Given tasks with durations and typed, lagged dependencies (FS, SS, FF, SF),
//! this crate computes earliest/latest start and finish times, slack, and the
//! critical path. It also detects cycles, projects offsets onto calendar
//! dates, validates dates against dependencies, finds downstream dependents,
//! and produces optimization suggestions.
//!
//! With the `python` feature the same operations are exposed as a Python
//! extension module.

// Allow clippy warning triggered by PyO3 macro expansion
#![cfg_attr(feature = "python", allow(clippy::useless_conversion))]

pub mod advisor;
pub mod backward_pass;
pub mod config;
pub mod critical_path;
pub mod cycles;
pub mod dates;
pub mod dependents;
pub mod error;
pub mod forward_pass;
pub mod graph;
pub mod interner;
pub mod logging;
pub mod models;
pub mod offsets;
pub mod topo;

#[cfg(feature = "python")]
mod python;

pub use advisor::{suggest_optimizations, suggestions_for, Impact, Suggestion, SuggestionType};
pub use config::{ScheduleConfig, ScheduleMode};
pub use critical_path::{
    calculate_critical_path, compute_schedule, snapshot_key, CriticalPathSummary, ScheduleCache,
    ScheduleResult, TaskTiming,
};
pub use cycles::{find_cycle, has_circular_dependency, would_create_cycle};
pub use dates::{
    calculate_task_dates, project_schedule, task_dates_by_id, validate_task_dates, DateViolation,
    ScheduledDates, TaskDates, ValidationReport,
};
pub use dependents::{build_dependents_map, get_dependent_tasks};
pub use error::ScheduleError;
pub use logging::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use models::{Dependency, DependencyType, Task};
pub use topo::{topological_order, TopologicalOrder};
