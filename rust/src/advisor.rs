//! Heuristic optimization suggestions over a computed schedule.
//!
//! Suggestions are advisory: they are derived from a [`ScheduleResult`] and
//! never change it.

use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;
use crate::critical_path::{compute_schedule, ScheduleResult};
use crate::error::ScheduleError;
use crate::models::{Dependency, Task};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    /// Tasks off the critical path that can run alongside critical work.
    Parallelization,
    /// Tasks with enough slack that their resources could be reassigned.
    ResourceReallocation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Low,
    Medium,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub description: String,
    pub impact: Impact,
    pub task_ids: Vec<String>,
}

/// Suggestions for an already computed schedule.
pub fn suggestions_for(result: &ScheduleResult, reallocation_slack_threshold: i64) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    let parallel: Vec<String> = result.non_critical().map(str::to_string).collect();
    if !parallel.is_empty() {
        suggestions.push(Suggestion {
            kind: SuggestionType::Parallelization,
            description: format!(
                "{} task(s) off the critical path can run in parallel with critical work",
                parallel.len()
            ),
            impact: Impact::Medium,
            task_ids: parallel,
        });
    }

    let spare: Vec<String> = result
        .order
        .iter()
        .filter(|id| result.slack(id).is_some_and(|s| s > reallocation_slack_threshold))
        .cloned()
        .collect();
    if !spare.is_empty() {
        suggestions.push(Suggestion {
            kind: SuggestionType::ResourceReallocation,
            description: format!(
                "{} task(s) have more than {} days of slack; their resources could be reassigned",
                spare.len(),
                reallocation_slack_threshold
            ),
            impact: Impact::Low,
            task_ids: spare,
        });
    }

    suggestions
}

/// Compute the schedule and suggest parallelization and reallocation opportunities.
pub fn suggest_optimizations(
    tasks: &[Task],
    dependencies: &[Dependency],
    config: &ScheduleConfig,
) -> Result<Vec<Suggestion>, ScheduleError> {
    let result = compute_schedule(tasks, dependencies, config)?;
    Ok(suggestions_for(&result, config.reallocation_slack_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> (Vec<Task>, Vec<Dependency>) {
        let tasks = vec![
            Task::new("a", 1),
            Task::new("b", 2),
            Task::new("c", 9),
            Task::new("d", 1),
            Task::new("e", 4),
        ];
        let deps = vec![
            Dependency::finish_to_start("a", "b"),
            Dependency::finish_to_start("a", "c"),
            Dependency::finish_to_start("b", "d"),
            Dependency::finish_to_start("c", "d"),
        ];
        (tasks, deps)
    }

    #[test]
    fn test_parallel_and_reallocation_suggestions() {
        let (tasks, deps) = diamond();
        let suggestions = suggest_optimizations(&tasks, &deps, &ScheduleConfig::default()).unwrap();

        // Project length 11: b has slack 7, e has slack 7
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].kind, SuggestionType::Parallelization);
        let mut parallel = suggestions[0].task_ids.clone();
        parallel.sort();
        assert_eq!(parallel, vec!["b", "e"]);

        assert_eq!(suggestions[1].kind, SuggestionType::ResourceReallocation);
        assert_eq!(suggestions[1].impact, Impact::Low);
        let mut spare = suggestions[1].task_ids.clone();
        spare.sort();
        assert_eq!(spare, vec!["b", "e"]);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let tasks = vec![Task::new("long", 10), Task::new("short", 5)];
        let suggestions = suggest_optimizations(&tasks, &[], &ScheduleConfig::default()).unwrap();

        // short has slack exactly 5: parallelizable, not reallocatable
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionType::Parallelization);
        assert_eq!(suggestions[0].task_ids, vec!["short"]);
    }

    #[test]
    fn test_fully_critical_schedule_has_no_suggestions() {
        let tasks = vec![Task::new("a", 2), Task::new("b", 3)];
        let deps = vec![Dependency::finish_to_start("a", "b")];
        let suggestions = suggest_optimizations(&tasks, &deps, &ScheduleConfig::default()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_suggestions_do_not_mutate_result() {
        let (tasks, deps) = diamond();
        let result = compute_schedule(&tasks, &deps, &ScheduleConfig::default()).unwrap();
        let before = result.clone();
        let _ = suggestions_for(&result, 0);
        assert_eq!(result, before);
    }

    #[test]
    fn test_serialized_shape() {
        let suggestion = Suggestion {
            kind: SuggestionType::ResourceReallocation,
            description: "x".to_string(),
            impact: Impact::Low,
            task_ids: vec!["a".to_string()],
        };
        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["type"], "resource_reallocation");
        assert_eq!(json["impact"], "low");
        assert_eq!(json["taskIds"][0], "a");
    }
}
