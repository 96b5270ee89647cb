//! Topological ordering of the task graph.
//!
//! Depth-first post-order, reversed, with an explicit work stack so that
//! long dependency chains cannot overflow the call stack. An edge into a node
//! that is still being visited closes a cycle: the cycle is recorded, the edge
//! is marked dropped and the traversal continues without following it.

use crate::graph::{EdgeId, TaskGraph};
use crate::interner::NodeId;
use crate::models::{Dependency, Task};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Visit {
    Unvisited,
    Visiting,
    Done,
}

/// Output of [`topological_sort`], in node ids.
#[derive(Clone, Debug, Default)]
pub struct TopoSort {
    /// Predecessor-first order over every node. When cycles were found it is
    /// only consistent with the edges that were not dropped.
    pub order: Vec<NodeId>,
    /// One entry per back-edge, listing the nodes of the closed cycle from
    /// the re-entered node to the node that closed it.
    pub cycles: Vec<Vec<NodeId>>,
    /// `dropped[edge]` is true for each back-edge excluded from the order.
    pub dropped: Vec<bool>,
}

impl TopoSort {
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    #[inline]
    pub fn is_dropped(&self, edge: EdgeId) -> bool {
        self.dropped[edge]
    }

    /// Every node that takes part in at least one detected cycle, in task order.
    pub fn cyclic_nodes(&self) -> Vec<NodeId> {
        let mut on_cycle = vec![false; self.order.len()];
        for &node in self.cycles.iter().flatten() {
            on_cycle[node as usize] = true;
        }
        (0..on_cycle.len() as NodeId)
            .filter(|&n| on_cycle[n as usize])
            .collect()
    }
}

/// Order the graph so every predecessor precedes its successors.
///
/// Roots are taken from the last task to the first, so that after the
/// post-order is reversed, isolated tasks and independent components appear
/// in the order the caller listed them.
pub fn topological_sort(graph: &TaskGraph<'_>) -> TopoSort {
    let n = graph.len();
    let mut state = vec![Visit::Unvisited; n];
    let mut dropped = vec![false; graph.edge_count()];
    let mut post_order: Vec<NodeId> = Vec::with_capacity(n);
    let mut cycles: Vec<Vec<NodeId>> = Vec::new();

    // (node, index of the next outgoing edge to explore)
    let mut stack: Vec<(NodeId, usize)> = Vec::new();

    for root in graph.nodes().rev() {
        if state[root as usize] != Visit::Unvisited {
            continue;
        }
        state[root as usize] = Visit::Visiting;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let outgoing = graph.outgoing(node);

            if frame.1 == outgoing.len() {
                state[node as usize] = Visit::Done;
                post_order.push(node);
                stack.pop();
                continue;
            }

            let edge_id = outgoing[frame.1];
            frame.1 += 1;
            let successor = graph.edge(edge_id).successor;

            match state[successor as usize] {
                Visit::Unvisited => {
                    state[successor as usize] = Visit::Visiting;
                    stack.push((successor, 0));
                }
                Visit::Visiting => {
                    dropped[edge_id] = true;
                    let start = stack
                        .iter()
                        .position(|&(n, _)| n == successor)
                        .unwrap_or(0);
                    cycles.push(stack[start..].iter().map(|&(n, _)| n).collect());
                }
                Visit::Done => {}
            }
        }
    }

    post_order.reverse();

    TopoSort {
        order: post_order,
        cycles,
        dropped,
    }
}

/// String-level view of a topological sort, for callers outside the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopologicalOrder {
    pub order: Vec<String>,
    pub cycles: Vec<Vec<String>>,
    /// The caller's dependency records that were excluded to break cycles.
    pub dropped_dependencies: Vec<Dependency>,
}

impl TopologicalOrder {
    pub fn is_acyclic(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Topologically sort `tasks` under `dependencies`.
pub fn topological_order(tasks: &[Task], dependencies: &[Dependency]) -> TopologicalOrder {
    let graph = TaskGraph::build(tasks, dependencies, 0);
    let sorted = topological_sort(&graph);

    let names = |nodes: &[NodeId]| -> Vec<String> {
        nodes.iter().map(|&n| graph.name(n).to_string()).collect()
    };

    let dropped_dependencies = (0..graph.edge_count())
        .filter(|&e| sorted.is_dropped(e))
        .map(|e| dependencies[graph.edge(e).source].clone())
        .collect();

    TopologicalOrder {
        order: names(sorted.order.as_slice()),
        cycles: sorted.cycles.iter().map(|c| names(c.as_slice())).collect(),
        dropped_dependencies,
    }
}
