//! Calendar projection of the day-offset schedule and date validation.
//!
//! Durations and lags are plain day counts; no working calendar is applied.

use chrono::{NaiveDate, TimeDelta};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::critical_path::ScheduleResult;
use crate::error::ScheduleError;
use crate::models::{Anchor, Dependency, DependencyType, Task};
use crate::offsets::{start_bound, Direction, Window};

/// `base` shifted by `days`, or `None` outside chrono's calendar range.
#[inline]
fn checked_offset(base: NaiveDate, days: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(days).and_then(|delta| base.checked_add_signed(delta))
}

/// `base` shifted by `days`, saturating at the ends of the calendar.
#[inline]
fn offset_date(base: NaiveDate, days: i64) -> NaiveDate {
    checked_offset(base, days).unwrap_or(if days < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

#[inline]
fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Calendar start and end of one task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDates {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Where `task` falls on the calendar given its predecessors' recorded dates.
///
/// Without predecessors the task starts on `project_start`. Otherwise each
/// incoming dependency imposes a floor on the start, computed from the
/// predecessor's start and due dates with the same per-type rules as the
/// forward pass; the latest floor wins and no task starts before
/// `project_start`. A predecessor without recorded dates is taken to start on
/// `project_start` and to run for its duration. Dependencies naming unknown
/// predecessors are ignored.
pub fn calculate_task_dates(
    task: &Task,
    tasks: &[Task],
    dependencies: &[Dependency],
    project_start: NaiveDate,
) -> TaskDates {
    let by_id: FxHashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let duration = task.duration_days();

    let start = dependencies
        .iter()
        .filter(|dep| dep.successor_id == task.id)
        .filter_map(|dep| {
            let pred = by_id.get(dep.predecessor_id.as_str())?;
            let window = recorded_window(pred, project_start);
            Some(start_bound(
                dep.kind,
                Direction::Earliest,
                dep.lag,
                window,
                duration,
            ))
        })
        .fold(0, i64::max);

    TaskDates {
        start_date: offset_date(project_start, start),
        end_date: offset_date(project_start, start.saturating_add(duration)),
    }
}

/// [`calculate_task_dates`] for the task named `task_id`.
pub fn task_dates_by_id(
    task_id: &str,
    tasks: &[Task],
    dependencies: &[Dependency],
    project_start: NaiveDate,
) -> Result<TaskDates, ScheduleError> {
    let task = tasks
        .iter()
        .find(|t| t.id == task_id)
        .ok_or_else(|| ScheduleError::UnknownTask(task_id.to_string()))?;
    Ok(calculate_task_dates(task, tasks, dependencies, project_start))
}

/// A task's recorded dates as day offsets from `project_start`.
fn recorded_window(task: &Task, project_start: NaiveDate) -> Window {
    let start = task
        .start_date
        .map(|d| days_between(project_start, d))
        .unwrap_or(0);
    match task.due_date {
        Some(due) => Window {
            start,
            finish: days_between(project_start, due),
        },
        None => Window::from_start(start, task.duration_days()),
    }
}

/// Calendar dates for every task of a computed schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledDates {
    pub task_id: String,
    pub earliest: TaskDates,
    pub latest: TaskDates,
    pub slack_days: i64,
}

/// Project the offsets of `result` onto the calendar, in topological order.
pub fn project_schedule(result: &ScheduleResult, project_start: NaiveDate) -> Vec<ScheduledDates> {
    result
        .order
        .iter()
        .filter_map(|id| {
            let timing = result.timing(id)?;
            Some(ScheduledDates {
                task_id: id.clone(),
                earliest: TaskDates {
                    start_date: offset_date(project_start, timing.earliest_start),
                    end_date: offset_date(project_start, timing.earliest_finish),
                },
                latest: TaskDates {
                    start_date: offset_date(project_start, timing.latest_start),
                    end_date: offset_date(project_start, timing.latest_finish),
                },
                slack_days: timing.slack,
            })
        })
        .collect()
}

/// One problem found by [`validate_task_dates`].
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DateViolation {
    #[error("Task {task_id}: start date {start_date} must be before due date {due_date}")]
    StartNotBeforeDue {
        task_id: String,
        start_date: NaiveDate,
        due_date: NaiveDate,
    },
    #[error("Task {task_id}: predecessor {predecessor_id} does not exist")]
    MissingPredecessor {
        task_id: String,
        predecessor_id: String,
    },
    #[error("Task {task_id} starts on {actual} before predecessor {predecessor_id} finishes (earliest allowed {required})")]
    StartsBeforePredecessorFinishes {
        task_id: String,
        predecessor_id: String,
        required: NaiveDate,
        actual: NaiveDate,
    },
    #[error("Task {task_id} starts on {actual} before predecessor {predecessor_id} starts (earliest allowed {required})")]
    StartsBeforePredecessorStarts {
        task_id: String,
        predecessor_id: String,
        required: NaiveDate,
        actual: NaiveDate,
    },
    #[error("Task {task_id} finishes on {actual} before predecessor {predecessor_id} finishes (earliest allowed {required})")]
    FinishesBeforePredecessorFinishes {
        task_id: String,
        predecessor_id: String,
        required: NaiveDate,
        actual: NaiveDate,
    },
    #[error("Task {task_id} finishes on {actual} before predecessor {predecessor_id} starts (earliest allowed {required})")]
    FinishesBeforePredecessorStarts {
        task_id: String,
        predecessor_id: String,
        required: NaiveDate,
        actual: NaiveDate,
    },
    #[error("Task {task_id}: lag {lag} after predecessor {predecessor_id} falls outside the calendar")]
    RequiredDateOutOfRange {
        task_id: String,
        predecessor_id: String,
        lag: i64,
    },
}

/// Outcome of validating one task's dates. `valid` iff `errors` is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub violations: Vec<DateViolation>,
}

impl ValidationReport {
    fn from_violations(violations: Vec<DateViolation>) -> Self {
        Self {
            valid: violations.is_empty(),
            errors: violations.iter().map(ToString::to_string).collect(),
            violations,
        }
    }
}

/// Check a task's recorded dates against themselves and its predecessors.
///
/// Never fails: every finding is accumulated. Checks that need a date which
/// is not recorded are skipped.
pub fn validate_task_dates(
    task: &Task,
    tasks: &[Task],
    dependencies: &[Dependency],
) -> ValidationReport {
    let by_id: FxHashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut violations = Vec::new();

    if let (Some(start_date), Some(due_date)) = (task.start_date, task.due_date) {
        if start_date >= due_date {
            violations.push(DateViolation::StartNotBeforeDue {
                task_id: task.id.clone(),
                start_date,
                due_date,
            });
        }
    }

    for dep in dependencies.iter().filter(|d| d.successor_id == task.id) {
        let Some(pred) = by_id.get(dep.predecessor_id.as_str()) else {
            violations.push(DateViolation::MissingPredecessor {
                task_id: task.id.clone(),
                predecessor_id: dep.predecessor_id.clone(),
            });
            continue;
        };

        let Some(pred_date) = anchor_date(pred, dep.kind.predecessor_anchor()) else {
            continue;
        };
        let Some(actual) = anchor_date(task, dep.kind.successor_anchor()) else {
            continue;
        };
        let Some(required) = checked_offset(pred_date, dep.lag) else {
            // A lead past the start of the calendar is always satisfied
            if dep.lag > 0 {
                violations.push(DateViolation::RequiredDateOutOfRange {
                    task_id: task.id.clone(),
                    predecessor_id: dep.predecessor_id.clone(),
                    lag: dep.lag,
                });
            }
            continue;
        };
        if actual >= required {
            continue;
        }

        let task_id = task.id.clone();
        let predecessor_id = dep.predecessor_id.clone();
        violations.push(match dep.kind {
            DependencyType::FinishToStart => DateViolation::StartsBeforePredecessorFinishes {
                task_id,
                predecessor_id,
                required,
                actual,
            },
            DependencyType::StartToStart => DateViolation::StartsBeforePredecessorStarts {
                task_id,
                predecessor_id,
                required,
                actual,
            },
            DependencyType::FinishToFinish => DateViolation::FinishesBeforePredecessorFinishes {
                task_id,
                predecessor_id,
                required,
                actual,
            },
            DependencyType::StartToFinish => DateViolation::FinishesBeforePredecessorStarts {
                task_id,
                predecessor_id,
                required,
                actual,
            },
        });
    }

    ValidationReport::from_violations(violations)
}

fn anchor_date(task: &Task, anchor: Anchor) -> Option<NaiveDate> {
    match anchor {
        Anchor::Start => task.start_date,
        Anchor::Finish => task.due_date,
    }
}
