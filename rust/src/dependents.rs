//! Downstream impact analysis: which tasks depend on a given task.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

use crate::models::Dependency;

/// Reverse-lookup map: predecessor id -> ids of its direct successors.
pub type DependentsMap<'a> = FxHashMap<&'a str, Vec<&'a str>>;

/// Build the direct-dependents map from a dependency list.
pub fn build_dependents_map(dependencies: &[Dependency]) -> DependentsMap<'_> {
    let mut dependents: DependentsMap =
        FxHashMap::with_capacity_and_hasher(dependencies.len(), Default::default());
    for dep in dependencies {
        dependents
            .entry(dep.predecessor_id.as_str())
            .or_default()
            .push(dep.successor_id.as_str());
    }
    dependents
}

/// Every task that directly or transitively depends on `task_id`.
///
/// Breadth-first, in discovery order. Visited tasks are tracked so the walk
/// terminates even if the dependencies contain a cycle; `task_id` itself is
/// never part of the result.
pub fn get_dependent_tasks(task_id: &str, dependencies: &[Dependency]) -> Vec<String> {
    let dependents = build_dependents_map(dependencies);
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut queue: VecDeque<&str> = VecDeque::new();
    let mut result = Vec::new();

    visited.insert(task_id);
    queue.push_back(task_id);

    while let Some(current) = queue.pop_front() {
        let Some(next) = dependents.get(current) else {
            continue;
        };
        for &succ in next {
            if visited.insert(succ) {
                result.push(succ.to_string());
                queue.push_back(succ);
            }
        }
    }

    result
}
