//! Dense integer ids for task strings.
//!
//! The graph works on `NodeId`s so every per-task table is a plain `Vec`
//! indexed by node; strings only appear at the API boundary.

use rustc_hash::FxHashMap;

/// Interned task id (u32 for compact storage and fast hashing).
pub type NodeId = u32;

/// Bidirectional mapping between task id strings and node ids.
///
/// Node ids are assigned in insertion order, so iterating `0..len()` visits
/// tasks in the order the caller listed them.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex<'a> {
    to_node: FxHashMap<&'a str, NodeId>,
    names: Vec<&'a str>,
}

impl<'a> TaskIndex<'a> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_node: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            names: Vec::with_capacity(capacity),
        }
    }

    /// Register a task id. Returns `None` if the id was already registered.
    pub fn insert(&mut self, name: &'a str) -> Option<NodeId> {
        if self.to_node.contains_key(name) {
            return None;
        }
        let id = self.names.len() as NodeId;
        self.names.push(name);
        self.to_node.insert(name, id);
        Some(id)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.to_node.get(name).copied()
    }

    #[inline]
    pub fn resolve(&self, id: NodeId) -> &'a str {
        self.names[id as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = NodeId> {
        0..self.names.len() as NodeId
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_resolve() {
        let mut index = TaskIndex::with_capacity(2);

        let a = index.insert("task_a").unwrap();
        let b = index.insert("task_b").unwrap();
        assert!(index.insert("task_a").is_none());

        assert_ne!(a, b);
        assert_eq!(index.resolve(a), "task_a");
        assert_eq!(index.get("task_b"), Some(b));
        assert_eq!(index.get("nonexistent"), None);
        assert_eq!(index.nodes().collect::<Vec<_>>(), vec![0, 1]);
    }
}
