//! Task graph: tasks as nodes, dependencies as typed, lagged edges.

use crate::interner::{NodeId, TaskIndex};
use crate::logging::{DiagnosticKind, Diagnostics};
use crate::models::{Dependency, DependencyType, Task};

/// Largest lag magnitude, in days, the passes accept. Longer lags are
/// clamped to this bound and reported. It is wider than any calendar span
/// chrono can represent.
pub const MAX_LAG_DAYS: i64 = 100_000_000;

/// Index into the graph's edge table.
pub type EdgeId = usize;

/// A resolved dependency between two known tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub predecessor: NodeId,
    pub successor: NodeId,
    pub kind: DependencyType,
    pub lag: i64,
    /// Position of the originating record in the caller's dependency slice.
    pub source: usize,
}

/// Adjacency representation of a task/dependency snapshot.
///
/// Built once per computation and never mutated afterwards. Dependencies that
/// reference unknown tasks are left out and reported through [`Diagnostics`].
pub struct TaskGraph<'a> {
    index: TaskIndex<'a>,
    tasks: Vec<&'a Task>,
    edges: Vec<Edge>,
    /// predecessor -> edges leaving it
    outgoing: Vec<Vec<EdgeId>>,
    /// successor -> edges entering it
    incoming: Vec<Vec<EdgeId>>,
    diagnostics: Diagnostics,
}

impl<'a> TaskGraph<'a> {
    pub fn build(tasks: &'a [Task], dependencies: &'a [Dependency], verbosity: u8) -> Self {
        let mut diagnostics = Diagnostics::new();
        let mut index = TaskIndex::with_capacity(tasks.len());
        let mut nodes: Vec<&'a Task> = Vec::with_capacity(tasks.len());

        for task in tasks {
            if index.insert(&task.id).is_some() {
                nodes.push(task);
                continue;
            }
            let first = index.get(&task.id).map(|n| nodes[n as usize]);
            if first == Some(task) {
                diagnostics.info(
                    verbosity,
                    DiagnosticKind::DuplicateTask,
                    format!("Task {} is listed more than once", task.id),
                    vec![task.id.clone()],
                );
            } else {
                diagnostics.warn(
                    verbosity,
                    DiagnosticKind::DuplicateTask,
                    format!("Duplicate task id {}; keeping the first definition", task.id),
                    vec![task.id.clone()],
                );
            }
        }

        let n = nodes.len();
        let mut edges = Vec::with_capacity(dependencies.len());
        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); n];

        for (source, dep) in dependencies.iter().enumerate() {
            let Some(predecessor) = index.get(&dep.predecessor_id) else {
                diagnostics.warn(
                    verbosity,
                    DiagnosticKind::UnknownPredecessor,
                    format!(
                        "Dependency {} -> {} references unknown predecessor {}",
                        dep.predecessor_id, dep.successor_id, dep.predecessor_id
                    ),
                    vec![dep.predecessor_id.clone(), dep.successor_id.clone()],
                );
                continue;
            };
            let Some(successor) = index.get(&dep.successor_id) else {
                diagnostics.warn(
                    verbosity,
                    DiagnosticKind::UnknownSuccessor,
                    format!(
                        "Dependency {} -> {} references unknown successor {}",
                        dep.predecessor_id, dep.successor_id, dep.successor_id
                    ),
                    vec![dep.predecessor_id.clone(), dep.successor_id.clone()],
                );
                continue;
            };

            let lag = dep.lag.clamp(-MAX_LAG_DAYS, MAX_LAG_DAYS);
            if lag != dep.lag {
                diagnostics.warn(
                    verbosity,
                    DiagnosticKind::LagOutOfRange,
                    format!(
                        "Dependency {} -> {} has lag {}; clamped to {}",
                        dep.predecessor_id, dep.successor_id, dep.lag, lag
                    ),
                    vec![dep.predecessor_id.clone(), dep.successor_id.clone()],
                );
            }

            let id = edges.len();
            edges.push(Edge {
                predecessor,
                successor,
                kind: dep.kind,
                lag,
                source,
            });
            outgoing[predecessor as usize].push(id);
            incoming[successor as usize].push(id);
        }

        Self {
            index,
            tasks: nodes,
            edges,
            outgoing,
            incoming,
            diagnostics,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = NodeId> {
        self.index.nodes()
    }

    #[inline]
    pub fn node(&self, task_id: &str) -> Option<NodeId> {
        self.index.get(task_id)
    }

    #[inline]
    pub fn name(&self, node: NodeId) -> &'a str {
        self.index.resolve(node)
    }

    #[inline]
    pub fn task(&self, node: NodeId) -> &'a Task {
        self.tasks[node as usize]
    }

    #[inline]
    pub fn duration(&self, node: NodeId) -> i64 {
        self.tasks[node as usize].duration_days()
    }

    #[inline]
    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge]
    }

    #[inline]
    pub fn outgoing(&self, node: NodeId) -> &[EdgeId] {
        &self.outgoing[node as usize]
    }

    #[inline]
    pub fn incoming(&self, node: NodeId) -> &[EdgeId] {
        &self.incoming[node as usize]
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Move the build-time diagnostics out, leaving the graph's copy empty.
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }
}
