//! Critical path calculation using forward and backward passes.

use rustc_hash::FxHashMap;

use crate::backward_pass::backward_pass;
use crate::config::{ScheduleConfig, ScheduleMode};
use crate::error::ScheduleError;
use crate::forward_pass::{forward_pass, project_duration};
use crate::graph::TaskGraph;
use crate::log_changes;
use crate::log_checks;
use crate::logging::{DiagnosticKind, Diagnostics};
use crate::models::{Dependency, Task};
use crate::topo::{topological_sort, TopoSort};

use super::types::{CriticalPathSummary, ScheduleResult, TaskTiming};

/// Compute the full CPM schedule for a snapshot of tasks and dependencies.
///
/// In strict mode any cycle is an error. In best-effort mode the edges that
/// close cycles are left out, the remaining graph is scheduled and the result
/// is marked `partial`.
pub fn compute_schedule(
    tasks: &[Task],
    dependencies: &[Dependency],
    config: &ScheduleConfig,
) -> Result<ScheduleResult, ScheduleError> {
    let verbosity = config.verbosity;
    let mut graph = TaskGraph::build(tasks, dependencies, verbosity);
    let sorted = topological_sort(&graph);
    let mut diagnostics = graph.take_diagnostics();

    if sorted.has_cycles() {
        match config.mode {
            ScheduleMode::Strict => {
                let task_ids = sorted
                    .cyclic_nodes()
                    .into_iter()
                    .map(|n| graph.name(n).to_string())
                    .collect();
                return Err(ScheduleError::CycleDetected { task_ids });
            }
            ScheduleMode::BestEffort => {
                report_broken_cycles(&graph, &sorted, dependencies, verbosity, &mut diagnostics)
            }
        }
    }

    let earliest = forward_pass(&graph, &sorted, verbosity);
    let critical_duration = project_duration(&earliest);
    let latest = backward_pass(&graph, &sorted, critical_duration, verbosity);

    let mut timings: FxHashMap<String, TaskTiming> =
        FxHashMap::with_capacity_and_hasher(graph.len(), Default::default());
    let mut critical: Vec<(i64, usize, &str)> = Vec::new();

    for (position, &node) in sorted.order.iter().enumerate() {
        let (early, late) = (earliest[node as usize], latest[node as usize]);
        let timing = TaskTiming {
            earliest_start: early.start,
            earliest_finish: early.finish,
            latest_start: late.start,
            latest_finish: late.finish,
            slack: late.finish.saturating_sub(early.finish),
        };
        let name = graph.name(node);
        log_checks!(verbosity, "{}: slack={}", name, timing.slack);
        if timing.is_critical() {
            critical.push((timing.earliest_start, position, name));
        }
        timings.insert(name.to_string(), timing);
    }

    critical.sort_unstable();
    let critical_path: Vec<String> = critical
        .into_iter()
        .map(|(_, _, name)| name.to_string())
        .collect();

    log_changes!(
        verbosity,
        "Critical path ({} days): {}",
        critical_duration,
        critical_path.join(" -> ")
    );

    Ok(ScheduleResult {
        timings,
        order: sorted
            .order
            .iter()
            .map(|&n| graph.name(n).to_string())
            .collect(),
        critical_path,
        critical_duration,
        partial: sorted.has_cycles(),
        diagnostics,
    })
}

fn report_broken_cycles(
    graph: &TaskGraph<'_>,
    sorted: &TopoSort,
    dependencies: &[Dependency],
    verbosity: u8,
    diagnostics: &mut Diagnostics,
) {
    for cycle in &sorted.cycles {
        let ids: Vec<String> = cycle.iter().map(|&n| graph.name(n).to_string()).collect();
        diagnostics.warn(
            verbosity,
            DiagnosticKind::CycleDetected,
            format!("Circular dependency: {}", ids.join(" -> ")),
            ids,
        );
    }
    for edge_id in (0..graph.edge_count()).filter(|&e| sorted.is_dropped(e)) {
        let dep = &dependencies[graph.edge(edge_id).source];
        diagnostics.warn(
            verbosity,
            DiagnosticKind::DroppedDependency,
            format!(
                "Ignoring {} dependency {} -> {} to break a cycle",
                dep.kind, dep.predecessor_id, dep.successor_id
            ),
            vec![dep.predecessor_id.clone(), dep.successor_id.clone()],
        );
    }
}

/// Critical path, its duration and per-task slack, under the default (strict) config.
pub fn calculate_critical_path(
    tasks: &[Task],
    dependencies: &[Dependency],
) -> Result<CriticalPathSummary, ScheduleError> {
    compute_schedule(tasks, dependencies, &ScheduleConfig::default()).map(|r| r.summary())
}
