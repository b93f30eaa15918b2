//! LRU (Least Recently Used) baseline engine.
//!
//! The simplest of the three policies and the building block the
//! adaptive engine's recent part is modeled on: a key index plus a
//! recency list, evicting the list tail when full.
//!
//! ```text
//!   ┌───────────────────────────┐   ┌──────────────────────────────┐
//!   │ index: FxHashMap<K, id>   │   │ list: RecencyList<Entry>     │
//!   │                           │   │                              │
//!   │   k1 ─► id_2 ─────────────┼───┼─► [k1,v1] ◄──► [k3,v3] ◄──►  │
//!   │   k3 ─► id_0              │   │    MRU                 LRU   │
//!   │   k2 ─► id_1              │   │  (last access)   (next evict)│
//!   └───────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! | Operation | Cost | Notes                                   |
//! |-----------|------|-----------------------------------------|
//! | `put`     | O(1) | may evict the LRU entry                 |
//! | `get`     | O(1) | moves the entry to the MRU position     |
//! | `peek`    | O(1) | no reordering                           |
//! | `purge`   | O(n) | drops everything                        |
//!
//! [`LruCore`] is single-threaded; [`ConcurrentLruCache`] wraps it in
//! one `parking_lot::Mutex` held for the full duration of every
//! operation, which makes each operation a single atomic step.

use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::recency_list::RecencyList;
use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;
use crate::traits::{CacheEngine, ReadOnlyCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Bounded LRU cache.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::{CacheEngine, ReadOnlyCache};
///
/// let mut cache = LruCore::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
///
/// // Touch "a" so "b" becomes the eviction victim.
/// cache.get(&"a");
/// cache.put("c", 3);
///
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// assert!(cache.contains(&"c"));
/// ```
#[derive(Debug)]
pub struct LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    list: RecencyList<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache holding at most `capacity` entries.
    ///
    /// Zero capacity creates a cache that rejects every write.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: RecencyList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// The least recently used entry, without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Non-panicking invariant probe for test harnesses.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.list.len() != self.index.len() {
            return Err(InvariantError::new("index and list disagree on length"));
        }
        if self.list.len() > self.capacity {
            return Err(InvariantError::new("live entries exceed capacity"));
        }
        for (key, &id) in &self.index {
            match self.list.get(id) {
                Some(entry) if &entry.key == key => {},
                _ => return Err(InvariantError::new("index points at a foreign node")),
            }
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.check_invariants().expect("lru invariants violated");
        self.list.debug_validate_invariants();
    }
}

impl<K, V> ReadOnlyCache<K> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CacheEngine<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            let entry = self.list.get_mut(id).expect("indexed node missing");
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if self.capacity == 0 {
            return None;
        }

        if self.index.len() >= self.capacity
            && let Some(evicted) = self.list.pop_back()
        {
            self.index.remove(&evicted.key);
        }

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    fn purge(&mut self) {
        self.list.clear();
        self.index.clear();
    }
}

/// Thread-safe LRU cache: one mutex per engine, held for the full
/// duration of each operation.
///
/// `get` hands back a clone because a reference cannot outlive the
/// lock guard.
#[derive(Debug)]
pub struct ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Mutex<LruCore<K, V>>,
}

impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a thread-safe LRU cache with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCore::new(capacity)),
        }
    }

    /// Inserts or overwrites; returns the previous value on overwrite.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().put(key, value)
    }

    /// Returns a clone of the value and refreshes its recency.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Returns a clone of the value without touching recency order.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    /// Returns `true` if `key` is live.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Maximum number of live entries.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Drops all live entries.
    pub fn purge(&self) {
        self.inner.lock().purge();
    }

    /// Runs `f` with the engine locked, for invariant checks in tests.
    pub fn with_core<R>(&self, f: impl FnOnce(&LruCore<K, V>) -> R) -> R {
        f(&self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = LruCore::new(2);
        cache.put(1, "one");
        cache.put(2, "two");
        cache.put(3, "three");

        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        assert_eq!(cache.len(), 2);
        cache.debug_validate_invariants();
    }

    #[test]
    fn get_refreshes_recency() {
        let mut cache = LruCore::new(2);
        cache.put(1, "one");
        cache.put(2, "two");
        assert_eq!(cache.get(&1), Some(&"one"));

        cache.put(3, "three");
        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
    }

    #[test]
    fn peek_does_not_reorder() {
        let mut cache = LruCore::new(2);
        cache.put(1, "one");
        cache.put(2, "two");
        assert_eq!(cache.peek(&1), Some(&"one"));

        cache.put(3, "three");
        assert!(!cache.contains(&1));
    }

    #[test]
    fn overwrite_returns_previous_and_refreshes() {
        let mut cache = LruCore::new(2);
        cache.put(1, "one");
        cache.put(2, "two");
        assert_eq!(cache.put(1, "ONE"), Some("one"));

        cache.put(3, "three");
        assert_eq!(cache.peek(&1), Some(&"ONE"));
        assert!(!cache.contains(&2));
    }

    #[test]
    fn pop_and_peek_lru() {
        let mut cache = LruCore::new(3);
        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.peek_lru(), Some((&1, &"a")));
        assert_eq!(cache.pop_lru(), Some((1, "a")));
        assert_eq!(cache.pop_lru(), Some((2, "b")));
        assert_eq!(cache.pop_lru(), None);
    }

    #[test]
    fn zero_capacity_rejects_writes() {
        let mut cache = LruCore::new(0);
        assert_eq!(cache.put(1, "one"), None);
        assert_eq!(cache.get(&1), None);
        assert!(cache.is_empty());
        cache.debug_validate_invariants();
    }

    #[test]
    fn purge_empties_cache() {
        let mut cache = LruCore::new(4);
        cache.put(1, "a");
        cache.put(2, "b");
        cache.purge();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
        cache.put(3, "c");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_wrapper_basic_ops() {
        let cache = ConcurrentLruCache::new(2);
        cache.put(1, "one".to_string());
        assert_eq!(cache.get(&1), Some("one".to_string()));
        assert_eq!(cache.len(), 1);
        cache.purge();
        assert!(cache.is_empty());
    }
}
