//! Memoization of schedule computations.
//!
//! UI call sites recompute the schedule on every edit, often with an
//! unchanged snapshot. The cache keys each result by a hash of the
//! (tasks, dependencies, config) snapshot and keeps a copy of the snapshot to
//! rule out hash collisions. Errors are never cached.

use rustc_hash::{FxHashMap, FxHasher};
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use crate::config::ScheduleConfig;
use crate::error::ScheduleError;
use crate::models::{Dependency, Task};

use super::calculation::compute_schedule;
use super::types::ScheduleResult;

/// Hash of a scheduling snapshot.
pub fn snapshot_key(tasks: &[Task], dependencies: &[Dependency], config: &ScheduleConfig) -> u64 {
    let mut hasher = FxHasher::default();
    tasks.hash(&mut hasher);
    dependencies.hash(&mut hasher);
    config.hash(&mut hasher);
    hasher.finish()
}

struct CacheEntry {
    tasks: Vec<Task>,
    dependencies: Vec<Dependency>,
    config: ScheduleConfig,
    result: ScheduleResult,
}

impl CacheEntry {
    fn matches(&self, tasks: &[Task], dependencies: &[Dependency], config: &ScheduleConfig) -> bool {
        self.tasks == tasks && self.dependencies == dependencies && &self.config == config
    }
}

/// Bounded first-in-first-out cache of schedule results.
pub struct ScheduleCache {
    entries: FxHashMap<u64, CacheEntry>,
    /// Insertion order, oldest first, for eviction.
    insertion_order: VecDeque<u64>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl ScheduleCache {
    /// A capacity of 0 disables caching; every call recomputes.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            insertion_order: VecDeque::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached result for this snapshot or compute and remember it.
    pub fn get_or_compute(
        &mut self,
        tasks: &[Task],
        dependencies: &[Dependency],
        config: &ScheduleConfig,
    ) -> Result<ScheduleResult, ScheduleError> {
        let key = snapshot_key(tasks, dependencies, config);

        if let Some(entry) = self.entries.get(&key) {
            if entry.matches(tasks, dependencies, config) {
                self.hits += 1;
                return Ok(entry.result.clone());
            }
        }

        self.misses += 1;
        let result = compute_schedule(tasks, dependencies, config)?;
        if self.capacity == 0 {
            return Ok(result);
        }

        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                match self.insertion_order.pop_front() {
                    Some(oldest) => {
                        self.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
            self.insertion_order.push_back(key);
        }

        // A colliding snapshot replaces the previous occupant of the slot
        self.entries.insert(
            key,
            CacheEntry {
                tasks: tasks.to_vec(),
                dependencies: dependencies.to_vec(),
                config: config.clone(),
                result: result.clone(),
            },
        );

        Ok(result)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for ScheduleCache {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleMode;

    fn chain() -> (Vec<Task>, Vec<Dependency>) {
        let tasks = vec![Task::new("a", 2), Task::new("b", 3)];
        let deps = vec![Dependency::finish_to_start("a", "b")];
        (tasks, deps)
    }

    #[test]
    fn test_hit_on_identical_snapshot() {
        let (tasks, deps) = chain();
        let config = ScheduleConfig::default();
        let mut cache = ScheduleCache::new(4);

        let first = cache.get_or_compute(&tasks, &deps, &config).unwrap();
        let second = cache.get_or_compute(&tasks, &deps, &config).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_snapshot_recomputes() {
        let (mut tasks, deps) = chain();
        let config = ScheduleConfig::default();
        let mut cache = ScheduleCache::new(4);

        let before = cache.get_or_compute(&tasks, &deps, &config).unwrap();
        tasks[1].duration = 10;
        let after = cache.get_or_compute(&tasks, &deps, &config).unwrap();

        assert_eq!(before.critical_duration, 5);
        assert_eq!(after.critical_duration, 12);
        assert_eq!(cache.misses(), 2);

        let relaxed = config.clone().with_mode(ScheduleMode::BestEffort);
        cache.get_or_compute(&tasks, &deps, &relaxed).unwrap();
        assert_eq!(cache.misses(), 3);
    }

    #[test]
    fn test_eviction_is_fifo() {
        let config = ScheduleConfig::default();
        let mut cache = ScheduleCache::new(2);
        let snapshots: Vec<Vec<Task>> = (1..=3).map(|d| vec![Task::new("a", d)]).collect();

        for tasks in &snapshots {
            cache.get_or_compute(tasks, &[], &config).unwrap();
        }
        assert_eq!(cache.len(), 2);

        // Oldest snapshot was evicted, newest is still cached
        cache.get_or_compute(&snapshots[2], &[], &config).unwrap();
        assert_eq!(cache.hits(), 1);
        cache.get_or_compute(&snapshots[0], &[], &config).unwrap();
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_errors_not_cached() {
        let tasks = vec![Task::new("a", 1), Task::new("b", 1)];
        let deps = vec![
            Dependency::finish_to_start("a", "b"),
            Dependency::finish_to_start("b", "a"),
        ];
        let config = ScheduleConfig::default();
        let mut cache = ScheduleCache::new(4);

        assert!(cache.get_or_compute(&tasks, &deps, &config).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let (tasks, deps) = chain();
        let config = ScheduleConfig::default();
        let mut cache = ScheduleCache::new(0);

        cache.get_or_compute(&tasks, &deps, &config).unwrap();
        cache.get_or_compute(&tasks, &deps, &config).unwrap();
        assert_eq!(cache.hits(), 0);
        assert!(cache.is_empty());
    }
}
