//! Backward pass: latest start and finish for every task.

use crate::graph::TaskGraph;
use crate::log_debug;
use crate::offsets::{start_bound, Direction, Window};
use crate::topo::TopoSort;

/// Compute latest windows, indexed by node, anchored at `project_duration`.
///
/// Tasks are visited in reverse topological order. A task's latest start is
/// the earliest of the ceilings imposed by its outgoing dependencies, and no
/// task may finish after the project does. Dropped back-edges are ignored.
pub fn backward_pass(
    graph: &TaskGraph<'_>,
    sorted: &TopoSort,
    project_duration: i64,
    verbosity: u8,
) -> Vec<Window> {
    let mut latest = vec![Window::default(); graph.len()];

    for &node in sorted.order.iter().rev() {
        let duration = graph.duration(node);
        let cap = project_duration.saturating_sub(duration);
        let start = graph
            .outgoing(node)
            .iter()
            .filter(|&&e| !sorted.is_dropped(e))
            .map(|&e| {
                let edge = graph.edge(e);
                start_bound(
                    edge.kind,
                    Direction::Latest,
                    edge.lag,
                    latest[edge.successor as usize],
                    duration,
                )
            })
            .fold(cap, i64::min);

        let window = Window::from_start(start, duration);
        latest[node as usize] = window;
        log_debug!(
            verbosity,
            "backward: {} LS={} LF={}",
            graph.name(node),
            window.start,
            window.finish
        );
    }

    latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward_pass::{forward_pass, project_duration};
    use crate::models::{Dependency, DependencyType, Task};
    use crate::topo::topological_sort;

    fn latest_of(tasks: &[Task], deps: &[Dependency]) -> (i64, Vec<Window>) {
        let graph = TaskGraph::build(tasks, deps, 0);
        let sorted = topological_sort(&graph);
        let earliest = forward_pass(&graph, &sorted, 0);
        let duration = project_duration(&earliest);
        (duration, backward_pass(&graph, &sorted, duration, 0))
    }

    #[test]
    fn test_sinks_anchor_at_project_duration() {
        let tasks = vec![Task::new("a", 2), Task::new("b", 5)];
        let (duration, latest) = latest_of(&tasks, &[]);

        assert_eq!(duration, 5);
        assert_eq!(latest[0], Window::from_finish(5, 2));
        assert_eq!(latest[1], Window::from_finish(5, 5));
    }

    #[test]
    fn test_diamond_latest_times() {
        let tasks = vec![
            Task::new("a", 1),
            Task::new("b", 2),
            Task::new("c", 5),
            Task::new("d", 1),
        ];
        let deps = vec![
            Dependency::finish_to_start("a", "b"),
            Dependency::finish_to_start("a", "c"),
            Dependency::finish_to_start("b", "d"),
            Dependency::finish_to_start("c", "d"),
        ];
        let (duration, latest) = latest_of(&tasks, &deps);

        assert_eq!(duration, 7);
        assert_eq!(latest[3], Window { start: 6, finish: 7 });
        assert_eq!(latest[2], Window { start: 1, finish: 6 });
        assert_eq!(latest[1], Window { start: 4, finish: 6 });
        // min(LS_b, LS_c) - 1 = 0
        assert_eq!(latest[0], Window { start: 0, finish: 1 });
    }

    #[test]
    fn test_start_to_start_predecessor_capped_by_project_end() {
        // a drives the project length but only constrains b's start
        let tasks = vec![Task::new("a", 10), Task::new("b", 1)];
        let deps = vec![Dependency::new("a", "b", DependencyType::StartToStart, 0)];
        let (duration, latest) = latest_of(&tasks, &deps);

        assert_eq!(duration, 10);
        assert_eq!(latest[0], Window { start: 0, finish: 10 });
        assert_eq!(latest[1], Window { start: 9, finish: 10 });
    }

    #[test]
    fn test_lag_pulls_predecessor_earlier() {
        let tasks = vec![Task::new("a", 2), Task::new("b", 1), Task::new("c", 9)];
        let deps = vec![Dependency::new("a", "b", DependencyType::FinishToStart, 3)];
        let (duration, latest) = latest_of(&tasks, &deps);

        assert_eq!(duration, 9);
        // b: LF = 9, LS = 8; a: LF = 8 - 3 = 5
        assert_eq!(latest[1], Window { start: 8, finish: 9 });
        assert_eq!(latest[0], Window { start: 3, finish: 5 });
    }
}
