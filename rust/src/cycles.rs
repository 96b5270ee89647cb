//! Cycle detection, independent of the topological sorter.
//!
//! Works directly on string ids over a borrowed adjacency view. Proposed
//! edits are checked through an overlay that adds one candidate edge on top
//! of the existing dependencies without copying or mutating them.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::{Dependency, Task};

/// Successor lists over known tasks, optionally extended by one candidate edge.
struct AdjacencyView<'a> {
    base: FxHashMap<&'a str, Vec<&'a str>>,
    candidate: Option<(&'a str, &'a str)>,
}

impl<'a> AdjacencyView<'a> {
    fn new(known: &FxHashSet<&'a str>, dependencies: &'a [Dependency]) -> Self {
        let mut base: FxHashMap<&'a str, Vec<&'a str>> = FxHashMap::default();
        for dep in dependencies {
            let (pred, succ) = (dep.predecessor_id.as_str(), dep.successor_id.as_str());
            if known.contains(pred) && known.contains(succ) {
                base.entry(pred).or_default().push(succ);
            }
        }
        Self {
            base,
            candidate: None,
        }
    }

    fn with_candidate(mut self, predecessor: &'a str, successor: &'a str) -> Self {
        self.candidate = Some((predecessor, successor));
        self
    }

    fn successors(&self, node: &str) -> Vec<&'a str> {
        let extra = self
            .candidate
            .filter(|(pred, _)| *pred == node)
            .map(|(_, succ)| succ);
        self.base
            .get(node)
            .into_iter()
            .flatten()
            .copied()
            .chain(extra)
            .collect()
    }
}

fn known_ids(tasks: &[Task]) -> FxHashSet<&str> {
    tasks.iter().map(|t| t.id.as_str()).collect()
}

/// DFS with an explicit recursion-stack set. Returns the first cycle found,
/// closed (first node repeated at the end).
fn find_cycle_in<'a>(
    view: &AdjacencyView<'a>,
    roots: impl Iterator<Item = &'a str>,
) -> Option<Vec<String>> {
    let mut done: FxHashSet<&'a str> = FxHashSet::default();
    let mut on_stack: FxHashSet<&'a str> = FxHashSet::default();
    // (node, its successors, next successor to explore)
    let mut stack: Vec<(&'a str, Vec<&'a str>, usize)> = Vec::new();

    for root in roots {
        if done.contains(root) {
            continue;
        }
        on_stack.insert(root);
        stack.push((root, view.successors(root), 0));

        while let Some((node, successors, next)) = stack.last_mut() {
            let node = *node;
            let Some(&succ) = successors.get(*next) else {
                on_stack.remove(node);
                done.insert(node);
                stack.pop();
                continue;
            };
            *next += 1;

            if on_stack.contains(succ) {
                let start = stack.iter().position(|(n, _, _)| *n == succ).unwrap_or(0);
                let mut cycle: Vec<String> =
                    stack[start..].iter().map(|(n, _, _)| n.to_string()).collect();
                cycle.push(succ.to_string());
                return Some(cycle);
            }
            if !done.contains(succ) {
                on_stack.insert(succ);
                stack.push((succ, view.successors(succ), 0));
            }
        }
    }

    None
}

/// Return a witness cycle if the dependency graph over `tasks` has one.
///
/// Dependencies naming unknown tasks are ignored.
pub fn find_cycle(tasks: &[Task], dependencies: &[Dependency]) -> Option<Vec<String>> {
    let known = known_ids(tasks);
    let view = AdjacencyView::new(&known, dependencies);
    find_cycle_in(&view, tasks.iter().map(|t| t.id.as_str()))
}

/// Whether the dependency graph over `tasks` contains a directed cycle.
pub fn has_circular_dependency(tasks: &[Task], dependencies: &[Dependency]) -> bool {
    find_cycle(tasks, dependencies).is_some()
}

/// Whether adding `candidate` to `existing` would close a new cycle.
///
/// True iff the candidate is a self-dependency or its predecessor is reachable
/// from its successor in the hypothetical graph. Cycles already present
/// elsewhere in `existing` do not count. A candidate naming an unknown task
/// cannot close a cycle.
pub fn would_create_cycle(tasks: &[Task], existing: &[Dependency], candidate: &Dependency) -> bool {
    let known = known_ids(tasks);
    let (pred, succ) = (
        candidate.predecessor_id.as_str(),
        candidate.successor_id.as_str(),
    );
    if !known.contains(pred) || !known.contains(succ) {
        return false;
    }
    if pred == succ {
        return true;
    }

    let view = AdjacencyView::new(&known, existing).with_candidate(pred, succ);
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut stack = vec![succ];
    visited.insert(succ);

    while let Some(node) = stack.pop() {
        for next in view.successors(node) {
            if next == pred {
                return true;
            }
            if visited.insert(next) {
                stack.push(next);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DependencyType;

    fn make_tasks(ids: &[&str]) -> Vec<Task> {
        ids.iter().map(|id| Task::new(*id, 1)).collect()
    }

    fn make_dep(pred: &str, succ: &str) -> Dependency {
        Dependency::finish_to_start(pred, succ)
    }

    #[test]
    fn test_acyclic_graph() {
        let tasks = make_tasks(&["a", "b", "c", "d"]);
        let deps = vec![
            make_dep("a", "b"),
            make_dep("a", "c"),
            make_dep("b", "d"),
            make_dep("c", "d"),
        ];
        assert!(!has_circular_dependency(&tasks, &deps));
        assert_eq!(find_cycle(&tasks, &deps), None);
    }

    #[test]
    fn test_cycle_witness_is_closed() {
        let tasks = make_tasks(&["a", "b", "c"]);
        let deps = vec![make_dep("a", "b"), make_dep("b", "c"), make_dep("c", "a")];

        assert!(has_circular_dependency(&tasks, &deps));
        assert_eq!(
            find_cycle(&tasks, &deps),
            Some(vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "a".to_string()
            ])
        );
    }

    #[test]
    fn test_cycle_through_any_dependency_type() {
        let tasks = make_tasks(&["a", "b"]);
        let deps = vec![
            Dependency::new("a", "b", DependencyType::StartToStart, -3),
            Dependency::new("b", "a", DependencyType::FinishToFinish, 2),
        ];
        assert!(has_circular_dependency(&tasks, &deps));
    }

    #[test]
    fn test_unknown_tasks_ignored() {
        let tasks = make_tasks(&["a"]);
        let deps = vec![make_dep("a", "ghost"), make_dep("ghost", "a")];
        assert!(!has_circular_dependency(&tasks, &deps));
    }

    #[test]
    fn test_would_create_cycle_closing_edge() {
        let tasks = make_tasks(&["a", "b", "c"]);
        let deps = vec![make_dep("a", "b"), make_dep("b", "c")];

        assert!(would_create_cycle(&tasks, &deps, &make_dep("c", "a")));
        assert!(would_create_cycle(&tasks, &deps, &make_dep("b", "a")));
        assert!(!would_create_cycle(&tasks, &deps, &make_dep("a", "c")));
        // Existing set untouched
        assert_eq!(deps.len(), 2);
        assert!(!has_circular_dependency(&tasks, &deps));
    }

    #[test]
    fn test_would_create_cycle_self_dependency() {
        let tasks = make_tasks(&["a"]);
        assert!(would_create_cycle(&tasks, &[], &make_dep("a", "a")));
    }

    #[test]
    fn test_unreachable_predecessor_never_false_positive() {
        // "x" has no incoming edges, so nothing can reach it
        let tasks = make_tasks(&["a", "b", "c", "x"]);
        let deps = vec![make_dep("a", "b"), make_dep("b", "c"), make_dep("c", "a")];

        assert!(!would_create_cycle(&tasks, &deps, &make_dep("x", "a")));
        assert!(!would_create_cycle(&tasks, &deps, &make_dep("x", "c")));
    }

    #[test]
    fn test_would_create_cycle_unknown_task() {
        let tasks = make_tasks(&["a"]);
        assert!(!would_create_cycle(&tasks, &[], &make_dep("a", "ghost")));
    }

    #[test]
    fn test_long_chain_cycle_detection() {
        let n = 50_000;
        let ids: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
        let tasks: Vec<Task> = ids.iter().map(|id| Task::new(id.clone(), 1)).collect();
        let mut deps: Vec<Dependency> = (1..n).map(|i| make_dep(&ids[i - 1], &ids[i])).collect();

        assert!(!has_circular_dependency(&tasks, &deps));
        assert!(would_create_cycle(&tasks, &deps, &make_dep(&ids[n - 1], &ids[0])));

        deps.push(make_dep(&ids[n - 1], &ids[0]));
        assert!(has_circular_dependency(&tasks, &deps));
    }
}
