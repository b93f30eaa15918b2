//! Bounded recency list of ghost entries.
//!
//! A ghost entry is the key of a recently evicted item, with no value
//! attached. Adaptive policies keep one ghost list per cache part: a
//! hit on a ghost means the part evicted something it should have kept,
//! which is the signal used to shift capacity toward that part.
//!
//! ```text
//!   ┌──────────────────────────┐   ┌──────────────────────────────┐
//!   │ index: FxHashMap<K, id>  │   │ list: RecencyList<K>         │
//!   │                          │   │                              │
//!   │   "a" ─► id_0 ───────────┼───┼─► [a] ◄──► [b] ◄──► [c]      │
//!   │   "b" ─► id_1            │   │  newest            oldest    │
//!   │   "c" ─► id_2            │   │  (front)        (next evict) │
//!   └──────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! `record` inserts at the newest end, evicting the oldest ghost when
//! the bound is reached. `remove` services a ghost hit. All operations
//! are O(1). A capacity of zero makes the list a no-op.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::recency_list::RecencyList;
use crate::ds::slot_arena::SlotId;

/// Bounded list of keys recently evicted from a main cache.
///
/// # Example
///
/// ```
/// use evictkit::ds::GhostList;
///
/// let mut ghost = GhostList::new(2);
/// ghost.record("a");
/// ghost.record("b");
///
/// // At the bound, the oldest ghost is dropped.
/// ghost.record("c");
/// assert!(!ghost.contains(&"a"));
/// assert!(ghost.contains(&"b"));
/// assert!(ghost.contains(&"c"));
///
/// // A ghost hit consumes the entry.
/// assert!(ghost.remove(&"b"));
/// assert!(!ghost.contains(&"b"));
/// ```
#[derive(Debug)]
pub struct GhostList<K> {
    list: RecencyList<K>,
    index: FxHashMap<K, SlotId>,
    capacity: usize,
}

impl<K> GhostList<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a ghost list holding at most `capacity` keys.
    ///
    /// Zero capacity creates a no-op list that records nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: RecencyList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    /// Configured bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns `true` if `key` is tracked: the ghost-hit check.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Records `key` as the newest ghost, evicting the oldest if full.
    ///
    /// Re-recording a tracked key promotes it to the newest position.
    pub fn record(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }

        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            return;
        }

        if self.list.len() >= self.capacity
            && let Some(oldest) = self.list.pop_back()
        {
            self.index.remove(&oldest);
        }

        let id = self.list.push_front(key.clone());
        self.index.insert(key, id);
    }

    /// Removes `key`; returns `true` if it was tracked.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.list.remove(id);
                true
            },
            None => false,
        }
    }

    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.list.len(), self.index.len());
        assert!(self.list.len() <= self.capacity);
        for &id in self.index.values() {
            assert!(self.list.contains(id));
        }
        self.list.debug_validate_invariants();
    }

    #[cfg(any(test, debug_assertions))]
    /// Keys from newest to oldest.
    pub fn debug_snapshot_keys(&self) -> Vec<K> {
        self.list.iter().cloned().collect()
    }
}
