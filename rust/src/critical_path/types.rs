//! Result types for critical path computation.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::logging::Diagnostics;

/// Per-task timing from the forward and backward passes, in day offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTiming {
    /// Earliest possible start time (from forward pass).
    pub earliest_start: i64,
    /// Earliest possible finish time (from forward pass).
    pub earliest_finish: i64,
    /// Latest allowable start time (from backward pass).
    pub latest_start: i64,
    /// Latest allowable finish time (from backward pass).
    pub latest_finish: i64,
    /// Slack = latest_finish - earliest_finish.
    pub slack: i64,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        self.slack == 0
    }
}

/// Full output of one schedule computation. Recomputed on every change; never persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub timings: FxHashMap<String, TaskTiming>,
    /// Every task, predecessors first.
    pub order: Vec<String>,
    /// Zero-slack tasks by ascending earliest start, ties in topological order.
    pub critical_path: Vec<String>,
    /// Latest earliest finish over all tasks.
    pub critical_duration: i64,
    /// True when cycles were broken to produce this result.
    pub partial: bool,
    pub diagnostics: Diagnostics,
}

impl ScheduleResult {
    pub fn timing(&self, task_id: &str) -> Option<&TaskTiming> {
        self.timings.get(task_id)
    }

    pub fn slack(&self, task_id: &str) -> Option<i64> {
        self.timings.get(task_id).map(|t| t.slack)
    }

    pub fn is_critical(&self, task_id: &str) -> bool {
        self.timings.get(task_id).is_some_and(TaskTiming::is_critical)
    }

    pub fn slack_by_task(&self) -> FxHashMap<String, i64> {
        self.timings
            .iter()
            .map(|(id, t)| (id.clone(), t.slack))
            .collect()
    }

    /// Tasks off the critical path, in topological order.
    pub fn non_critical(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .map(String::as_str)
            .filter(|id| !self.is_critical(id))
    }

    pub fn summary(&self) -> CriticalPathSummary {
        CriticalPathSummary {
            critical_path: self.critical_path.clone(),
            critical_duration: self.critical_duration,
            slack_by_task: self.slack_by_task(),
        }
    }
}

/// What UI call sites need from a schedule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPathSummary {
    pub critical_path: Vec<String>,
    pub critical_duration: i64,
    pub slack_by_task: FxHashMap<String, i64>,
}
