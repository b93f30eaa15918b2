//! LFU (Least Frequently Used) engine with frequency aging.
//!
//! Evicts the entry with the lowest access frequency; among entries at
//! the same frequency the oldest arrival goes first. A running access
//! total drives an aging pass that periodically halves every frequency
//! so the cache can forget stale popularity and adapt to workload
//! shifts, the classic fix for plain LFU's "hot once, resident
//! forever" failure mode.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                     AgingLfuCache<K, V>                      │
//!   │                                                              │
//!   │   meta: FreqBuckets<K>          values: FxHashMap<K, V>      │
//!   │   ┌──────────────────────┐      ┌───────────────────────┐    │
//!   │   │ freq 1: [d]          │      │  a ─► value_a         │    │
//!   │   │ freq 3: [b] ─ [c]    │      │  b ─► value_b         │    │
//!   │   │ freq 9: [a]          │      │  c ─► value_c         │    │
//!   │   │         ▲            │      │  d ─► value_d         │    │
//!   │   │     min_freq = 1     │      └───────────────────────┘    │
//!   │   └──────────────────────┘                                   │
//!   │                                                              │
//!   │   total_accesses: u64      max_average: u64                  │
//!   │   average = total_accesses / len   (integer division)        │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Aging
//!
//! Every access (hit, overwrite, or insert) bumps `total_accesses`;
//! eviction subtracts the victim's frequency. Whenever the integer
//! average `total_accesses / len` exceeds `max_average`:
//!
//! 1. every entry's frequency drops by `max_average / 2`, floored at 1,
//!    and the entry is re-queued at the newest position of its target
//!    bucket;
//! 2. `min_freq` ends at the smallest occupied bucket;
//! 3. `total_accesses` is recomputed as the sum of post-aging
//!    frequencies, so the average reflects what the buckets actually
//!    hold.
//!
//! The pass is O(len); it amortizes to O(1) per access because at
//! least `len · max_average / 2` accesses must accrue between passes.
//!
//! | Operation | Cost            | Notes                             |
//! |-----------|-----------------|-----------------------------------|
//! | `put`     | O(1) amortized  | at most one eviction, maybe aging |
//! | `get`     | O(1) amortized  | frequency bump, maybe aging       |
//! | `peek`    | O(1)            | no policy update                  |
//! | `purge`   | O(n)            | resets counters too               |
//!
//! [`AgingLfuCache`] is single-threaded; [`ConcurrentLfuCache`] wraps
//! it in one `parking_lot::Mutex` held across each whole operation.

use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::freq_buckets::FreqBuckets;
use crate::error::InvariantError;
use crate::traits::{CacheEngine, ReadOnlyCache};

/// Aging trigger used by [`AgingLfuCache::new`]: aging runs once the
/// mean access frequency exceeds this.
pub const DEFAULT_MAX_AVERAGE: u64 = 10;

/// Bounded LFU cache with frequency aging.
///
/// # Example
///
/// ```
/// use evictkit::policy::lfu::AgingLfuCache;
/// use evictkit::traits::{CacheEngine, ReadOnlyCache};
///
/// let mut cache = AgingLfuCache::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
///
/// // "a" gains a second access; "b" stays at frequency 1.
/// cache.get(&"a");
///
/// // Full: the least frequent entry ("b") is evicted.
/// cache.put("c", 3);
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// assert!(cache.contains(&"c"));
/// ```
#[derive(Debug)]
pub struct AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    meta: FreqBuckets<K>,
    values: FxHashMap<K, V>,
    capacity: usize,
    max_average: u64,
    total_accesses: u64,
}

impl<K, V> AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU cache with the default aging trigger
    /// ([`DEFAULT_MAX_AVERAGE`]).
    pub fn new(capacity: usize) -> Self {
        Self::with_max_average(capacity, DEFAULT_MAX_AVERAGE)
    }

    /// Creates an LFU cache that ages once the mean access frequency
    /// exceeds `max_average`.
    ///
    /// Values below 2 make the halving step `max_average / 2` vanish;
    /// [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build)
    /// rejects them.
    pub fn with_max_average(capacity: usize, max_average: u64) -> Self {
        Self {
            meta: FreqBuckets::with_capacity(capacity),
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
            max_average,
            total_accesses: 0,
        }
    }

    /// Access frequency of a key, if live.
    ///
    /// Starts at 1 on insert; every `get` and overwriting `put` adds 1.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.meta.frequency(key)
    }

    /// Smallest frequency among live entries: the eviction pool.
    pub fn min_freq(&self) -> Option<u64> {
        self.meta.min_freq()
    }

    /// Configured aging trigger.
    pub fn max_average(&self) -> u64 {
        self.max_average
    }

    /// Running total of access counts across live entries.
    pub fn total_accesses(&self) -> u64 {
        self.total_accesses
    }

    /// Current integer mean frequency (`0` when empty).
    pub fn current_average(&self) -> u64 {
        if self.values.is_empty() {
            0
        } else {
            self.total_accesses / self.values.len() as u64
        }
    }

    /// Removes and returns the least frequently used entry.
    pub fn pop_lfu(&mut self) -> Option<(K, V)> {
        let (key, freq) = self.meta.pop_min()?;
        self.total_accesses -= freq;
        let value = self.values.remove(&key).expect("victim value missing");
        Some((key, value))
    }

    /// The least frequently used entry, without removing it.
    pub fn peek_lfu(&self) -> Option<(&K, &V)> {
        let (key, _) = self.meta.peek_min()?;
        self.values.get(key).map(|value| (key, value))
    }

    /// Counts one access and runs aging if the mean crossed the
    /// ceiling.
    fn record_access(&mut self) {
        self.total_accesses += 1;
        if !self.values.is_empty() && self.current_average() > self.max_average {
            self.age();
        }
    }

    /// Halves every frequency by `max_average / 2` (floor 1), then
    /// resynchronizes the running total with the buckets.
    fn age(&mut self) {
        let delta = self.max_average / 2;
        let snapshot: Vec<(K, u64)> = self
            .meta
            .iter()
            .map(|(key, freq)| (key.clone(), freq))
            .collect();
        for (key, freq) in snapshot {
            self.meta.set_frequency(&key, freq.saturating_sub(delta).max(1));
        }
        self.total_accesses = self.meta.iter().map(|(_, freq)| freq).sum();
    }

    /// Non-panicking invariant probe for test harnesses.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.meta.len() != self.values.len() {
            return Err(InvariantError::new("metadata and value maps disagree"));
        }
        if self.values.len() > self.capacity {
            return Err(InvariantError::new("live entries exceed capacity"));
        }
        if self.values.is_empty() != self.meta.min_freq().is_none() {
            return Err(InvariantError::new("min_freq sentinel out of sync"));
        }
        let freq_sum: u64 = self.meta.iter().map(|(_, freq)| freq).sum();
        if freq_sum != self.total_accesses {
            return Err(InvariantError::new(
                "total_accesses drifted from bucket frequencies",
            ));
        }
        for (key, _) in self.meta.iter() {
            if !self.values.contains_key(key) {
                return Err(InvariantError::new("tracked key has no value"));
            }
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.check_invariants().expect("lfu invariants violated");
        self.meta.debug_validate_invariants();
    }
}

impl<K, V> ReadOnlyCache<K> for AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CacheEngine<K, V> for AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.values.contains_key(&key) {
            // An overwrite counts as an access.
            self.meta.touch(&key);
            let old = self.values.insert(key, value);
            self.record_access();
            return old;
        }

        if self.capacity == 0 {
            return None;
        }

        if self.values.len() >= self.capacity
            && let Some((victim, freq)) = self.meta.pop_min()
        {
            self.values.remove(&victim);
            self.total_accesses -= freq;
        }

        self.meta.insert(key.clone());
        self.values.insert(key, value);
        self.record_access();
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        if !self.values.contains_key(key) {
            return None;
        }
        self.meta.touch(key);
        self.record_access();
        self.values.get(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    fn purge(&mut self) {
        self.meta.clear();
        self.values.clear();
        self.total_accesses = 0;
    }
}

/// Thread-safe aging-LFU cache: one mutex per engine, held for the
/// full duration of each operation.
#[derive(Debug)]
pub struct ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Mutex<AgingLfuCache<K, V>>,
}

impl<K, V> ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a thread-safe LFU cache with the default aging trigger.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(AgingLfuCache::new(capacity)),
        }
    }

    /// Creates a thread-safe LFU cache with an explicit aging trigger.
    pub fn with_max_average(capacity: usize, max_average: u64) -> Self {
        Self {
            inner: Mutex::new(AgingLfuCache::with_max_average(capacity, max_average)),
        }
    }

    /// Inserts or overwrites; returns the previous value on overwrite.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().put(key, value)
    }

    /// Returns a clone of the value and bumps its frequency.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Returns a clone of the value without touching policy state.
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

    /// Drops all live entries and resets access accounting.
    pub fn purge(&self) {
        self.inner.lock().purge();
    }

    /// Runs `f` with the engine locked, for invariant checks in tests.
    pub fn with_core<R>(&self, f: impl FnOnce(&AgingLfuCache<K, V>) -> R) -> R {
        f(&self.inner.lock())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Invariants hold after arbitrary put/get/peek/purge sequences.
        #[test]
        fn prop_invariants_always_hold(
            capacity in 0usize..8,
            max_average in 2u64..6,
            ops in prop::collection::vec((0u8..4, 0u32..12), 0..120)
        ) {
            let mut cache: AgingLfuCache<u32, u32> =
                AgingLfuCache::with_max_average(capacity, max_average);

            for (op, key) in ops {
                match op {
                    0 => { cache.put(key, key.wrapping_mul(7)); },
                    1 => { cache.get(&key); },
                    2 => { cache.peek(&key); },
                    _ => {
                        if key == 0 {
                            cache.purge();
                        } else {
                            cache.pop_lfu();
                        }
                    },
                }
                prop_assert!(cache.len() <= capacity);
                cache.debug_validate_invariants();
            }
        }

        /// A put followed by a get round-trips when capacity allows.
        #[test]
        fn prop_put_get_roundtrip(
            capacity in 1usize..8,
            key in 0u32..100,
            value in 0u32..100
        ) {
            let mut cache: AgingLfuCache<u32, u32> = AgingLfuCache::new(capacity);
            cache.put(key, value);
            prop_assert_eq!(cache.get(&key), Some(&value));
        }
    }
}
