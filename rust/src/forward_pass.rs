//! Forward pass: earliest start and finish for every task.

use crate::graph::TaskGraph;
use crate::interner::NodeId;
use crate::log_debug;
use crate::offsets::{start_bound, Direction, Window};
use crate::topo::TopoSort;

/// Compute earliest windows, indexed by node.
///
/// Tasks are visited in topological order. A task's earliest start is the
/// latest of the floors imposed by its incoming dependencies, never earlier
/// than the project start (offset 0). Dropped back-edges are ignored.
pub fn forward_pass(graph: &TaskGraph<'_>, sorted: &TopoSort, verbosity: u8) -> Vec<Window> {
    let mut earliest = vec![Window::default(); graph.len()];

    for &node in &sorted.order {
        let duration = graph.duration(node);
        let start = graph
            .incoming(node)
            .iter()
            .filter(|&&e| !sorted.is_dropped(e))
            .map(|&e| {
                let edge = graph.edge(e);
                start_bound(
                    edge.kind,
                    Direction::Earliest,
                    edge.lag,
                    earliest[edge.predecessor as usize],
                    duration,
                )
            })
            .fold(0, i64::max);

        let window = Window::from_start(start, duration);
        earliest[node as usize] = window;
        log_debug!(
            verbosity,
            "forward: {} ES={} EF={}",
            graph.name(node),
            window.start,
            window.finish
        );
    }

    earliest
}

/// Length of the schedule: the latest earliest finish over all tasks.
pub fn project_duration(earliest: &[Window]) -> i64 {
    earliest.iter().map(|w| w.finish).max().unwrap_or(0)
}

/// The node whose earliest finish sets the project duration (first in order on ties).
pub fn finishing_node(sorted: &TopoSort, earliest: &[Window]) -> Option<NodeId> {
    let duration = project_duration(earliest);
    sorted
        .order
        .iter()
        .copied()
        .find(|&n| earliest[n as usize].finish == duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dependency, DependencyType, Task};
    use crate::topo::topological_sort;

    fn earliest_of(tasks: &[Task], deps: &[Dependency]) -> Vec<(String, Window)> {
        let graph = TaskGraph::build(tasks, deps, 0);
        let sorted = topological_sort(&graph);
        let earliest = forward_pass(&graph, &sorted, 0);
        graph
            .nodes()
            .map(|n| (graph.name(n).to_string(), earliest[n as usize]))
            .collect()
    }

    fn window(start: i64, finish: i64) -> Window {
        Window { start, finish }
    }

    #[test]
    fn test_linear_chain() {
        let tasks = vec![Task::new("a", 2), Task::new("b", 3), Task::new("c", 4)];
        let deps = vec![
            Dependency::finish_to_start("a", "b"),
            Dependency::finish_to_start("b", "c"),
        ];
        let result = earliest_of(&tasks, &deps);

        assert_eq!(result[0].1, window(0, 2));
        assert_eq!(result[1].1, window(2, 5));
        assert_eq!(result[2].1, window(5, 9));
    }

    #[test]
    fn test_binding_constraint_is_latest_floor() {
        let tasks = vec![Task::new("a", 2), Task::new("b", 7), Task::new("c", 1)];
        let deps = vec![
            Dependency::finish_to_start("a", "c"),
            Dependency::new("b", "c", DependencyType::StartToStart, 1),
        ];
        let result = earliest_of(&tasks, &deps);

        // floors: FS from a = 2, SS from b = 0 + 1 = 1
        assert_eq!(result[2].1, window(2, 3));
    }

    #[test]
    fn test_finish_anchored_successor() {
        let tasks = vec![Task::new("a", 10), Task::new("b", 4)];
        let deps = vec![Dependency::new("a", "b", DependencyType::FinishToFinish, 2)];
        let result = earliest_of(&tasks, &deps);

        // b must finish at or after 12, so it starts at 8
        assert_eq!(result[1].1, window(8, 12));
    }

    #[test]
    fn test_start_never_before_project_start() {
        let tasks = vec![Task::new("a", 1), Task::new("b", 5)];
        let deps = vec![Dependency::new("a", "b", DependencyType::StartToFinish, 0)];
        let result = earliest_of(&tasks, &deps);

        // floor = 0 + 0 - 5 = -5, clamped to 0
        assert_eq!(result[1].1, window(0, 5));
    }

    #[test]
    fn test_lag_and_lead() {
        let tasks = vec![Task::new("a", 4), Task::new("b", 1), Task::new("c", 1)];
        let deps = vec![
            Dependency::new("a", "b", DependencyType::FinishToStart, 3),
            Dependency::new("a", "c", DependencyType::FinishToStart, -2),
        ];
        let result = earliest_of(&tasks, &deps);

        assert_eq!(result[1].1, window(7, 8));
        assert_eq!(result[2].1, window(2, 3));
    }

    #[test]
    fn test_finishing_node() {
        let tasks = vec![Task::new("a", 2), Task::new("b", 6)];
        let graph = TaskGraph::build(&tasks, &[], 0);
        let sorted = topological_sort(&graph);
        let earliest = forward_pass(&graph, &sorted, 0);

        assert_eq!(project_duration(&earliest), 6);
        assert_eq!(finishing_node(&sorted, &earliest), graph.node("b"));
    }
}
