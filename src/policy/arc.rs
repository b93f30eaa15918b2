//! Adaptive two-part replacement engine (ARC-style).
//!
//! Composes a recency-managed part and a frequency-managed part, each
//! with its own capacity and its own ghost list of recently evicted
//! keys. A hit on a part's ghost list means that part evicted a key it
//! should have kept, so one unit of capacity shifts toward it. Keys
//! that prove themselves in the recent part (`transform_threshold`
//! hits) are copied into the frequent part and served from there.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          ArcCache<K, V>                             │
//! │                                                                     │
//! │   Recent part (recency)            Frequent part (frequency)        │
//! │   ┌─────────────────────────┐      ┌─────────────────────────┐      │
//! │   │ MRU              LRU    │      │ freq buckets, min_freq  │      │
//! │   │  ▼                ▼     │      │  1: [x]   4: [y] ─ [z]  │      │
//! │   │ [c] ◄──► [a] ◄──► [b]   │      │                         │      │
//! │   │ access_count per entry  │      │ capacity_f              │      │
//! │   │ capacity_r              │      └──────────┬──────────────┘      │
//! │   └──────────┬──────────────┘                 │ evict               │
//! │              │ evict                          ▼                     │
//! │   ┌──────────▼──────────────┐      ┌─────────────────────────┐      │
//! │   │ ghost: recent evictions │      │ ghost: freq. evictions  │      │
//! │   │ (keys only, bounded)    │      │ (keys only, bounded)    │      │
//! │   └─────────────────────────┘      └─────────────────────────┘      │
//! │                                                                     │
//! │   ghost hit on recent side  → frequent part cedes one capacity      │
//! │   ghost hit on frequent side→ recent part cedes one capacity        │
//! │   capacity_r + capacity_f is conserved across every operation       │
//! └─────────────────────────────────────────────────────────────────────┘
//!
//! Access flow
//! ───────────
//!
//!   get(k):
//!     1. Ghost check: a hit on either ghost removes the key there and
//!        shifts one unit of capacity toward that part.
//!     2. Recent-part lookup. A miss is a miss, even if the frequent
//!        part still holds the key (it can be re-admitted via put).
//!     3. On the hit the entry's access count rises; reaching
//!        transform_threshold copies the value into the frequent part.
//!     4. If the frequent part holds the key, it serves the read and
//!        its frequency rises; otherwise the recent part serves it.
//!
//!   put(k, v):
//!     1. Ghost check, as above.
//!     2. Always writes the recent part (insert or overwrite).
//!     3. If the frequent part already holds the key, the overwrite is
//!        mirrored there so both copies stay in sync.
//! ```
//!
//! | Operation | Cost | Notes                                        |
//! |-----------|------|----------------------------------------------|
//! | `put`     | O(1) | at most one eviction per part                |
//! | `get`     | O(1) | may promote into the frequent part           |
//! | `peek`    | O(1) | frequent side wins when both hold the key    |
//! | `len`     | O(n) | counts distinct keys across both parts       |
//! | `purge`   | O(n) | keeps ghosts and learned capacities          |
//!
//! ## Departures from classic ARC
//!
//! This is not the Megiddo–Modha formulation. Both parts start at the
//! full configured capacity (the conserved total is twice the
//! configured value), each ghost list is fixed at the configured
//! capacity and never adapts, and the adaptation step is always a
//! single capacity unit rather than a ratio-weighted delta. Promotion
//! is governed by an explicit hit threshold instead of the T1→T2 move
//! on second access.
//!
//! [`ArcCache`] is single-threaded; [`ConcurrentArcCache`] wraps it in
//! one `parking_lot::Mutex` held across each whole operation.

use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::freq_buckets::FreqBuckets;
use crate::ds::ghost_list::GhostList;
use crate::ds::recency_list::RecencyList;
use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;
use crate::traits::{CacheEngine, ReadOnlyCache};

/// Promotion threshold used by [`ArcCache::new`]: hits in the recent
/// part before a key is copied into the frequent part.
pub const DEFAULT_TRANSFORM_THRESHOLD: u64 = 2;

#[derive(Debug)]
struct RecentEntry<K, V> {
    key: K,
    value: V,
    access_count: u64,
}

/// Recency-managed half: LRU list with per-entry hit counts plus a
/// ghost list of its evictions.
#[derive(Debug)]
struct RecentPart<K, V> {
    list: RecencyList<RecentEntry<K, V>>,
    index: FxHashMap<K, SlotId>,
    ghost: GhostList<K>,
    capacity: usize,
    transform_threshold: u64,
}

impl<K, V> RecentPart<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(capacity: usize, transform_threshold: u64) -> Self {
        Self {
            list: RecencyList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            // Ghost capacity stays pinned to the configured capacity
            // even as the live capacity adapts.
            ghost: GhostList::new(capacity),
            capacity,
            transform_threshold,
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            let entry = self.list.get_mut(id).expect("indexed node missing");
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if self.capacity == 0 {
            return None;
        }

        if self.index.len() >= self.capacity {
            self.evict_lru();
        }
        let id = self.list.push_front(RecentEntry {
            key: key.clone(),
            value,
            access_count: 1,
        });
        self.index.insert(key, id);
        None
    }

    /// Refreshes recency and bumps the hit count; returns whether the
    /// entry just reached the promotion threshold.
    fn touch(&mut self, key: &K) -> Option<bool> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        let entry = self.list.get_mut(id).expect("indexed node missing");
        entry.access_count = entry.access_count.saturating_add(1);
        Some(entry.access_count >= self.transform_threshold)
    }

    fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.remove(key)
    }

    fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    fn decrease_capacity(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.index.len() == self.capacity {
            self.evict_lru();
        }
        self.capacity -= 1;
        true
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            self.index.remove(&entry.key);
            self.ghost.record(entry.key);
        }
    }

    fn purge_live(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new("recent part index/list length skew"));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new("recent part over capacity"));
        }
        for key in self.index.keys() {
            if self.ghost.contains(key) {
                return Err(InvariantError::new("key live and ghosted in recent part"));
            }
        }
        Ok(())
    }
}

/// Frequency-managed half: frequency buckets plus a ghost list of its
/// evictions. No aging; the standalone LFU engine owns that concern.
#[derive(Debug)]
struct FrequentPart<K, V> {
    meta: FreqBuckets<K>,
    values: FxHashMap<K, V>,
    ghost: GhostList<K>,
    capacity: usize,
}

impl<K, V> FrequentPart<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(capacity: usize) -> Self {
        Self {
            meta: FreqBuckets::with_capacity(capacity),
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            ghost: GhostList::new(capacity),
            capacity,
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    fn keys(&self) -> impl Iterator<Item = &K> {
        self.values.keys()
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.values.contains_key(&key) {
            self.meta.touch(&key);
            return self.values.insert(key, value);
        }

        if self.capacity == 0 {
            return None;
        }

        if self.values.len() >= self.capacity {
            self.evict_lfu();
        }
        self.meta.insert(key.clone());
        self.values.insert(key, value);
        None
    }

    /// Frequency bump without reading the value; `false` on miss.
    fn touch(&mut self, key: &K) -> bool {
        self.meta.touch(key).is_some()
    }

    fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.remove(key)
    }

    fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    fn decrease_capacity(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.values.len() == self.capacity {
            self.evict_lfu();
        }
        self.capacity -= 1;
        true
    }

    fn evict_lfu(&mut self) {
        if let Some((key, _)) = self.meta.pop_min() {
            self.values.remove(&key);
            self.ghost.record(key);
        }
    }

    fn purge_live(&mut self) {
        self.meta.clear();
        self.values.clear();
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.meta.len() != self.values.len() {
            return Err(InvariantError::new("frequent part meta/value length skew"));
        }
        if self.values.len() > self.capacity {
            return Err(InvariantError::new("frequent part over capacity"));
        }
        for key in self.values.keys() {
            if self.ghost.contains(key) {
                return Err(InvariantError::new(
                    "key live and ghosted in frequent part",
                ));
            }
        }
        Ok(())
    }
}

/// Adaptive two-part cache.
///
/// # Example
///
/// ```
/// use evictkit::policy::arc::ArcCache;
/// use evictkit::traits::CacheEngine;
///
/// let mut cache = ArcCache::with_threshold(4, 2);
/// cache.put("page", 1);
/// assert_eq!(cache.recent_len(), 1);
/// assert_eq!(cache.frequent_len(), 0);
///
/// // The insert counted as the first access, so this first hit
/// // reaches the threshold and promotes the key.
/// cache.get(&"page");
/// assert_eq!(cache.frequent_len(), 1);
/// assert_eq!(cache.get(&"page"), Some(&1));
/// ```
pub struct ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    recent: RecentPart<K, V>,
    frequent: FrequentPart<K, V>,
    capacity: usize,
    transform_threshold: u64,
}

impl<K, V> ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an adaptive cache with the default promotion threshold
    /// ([`DEFAULT_TRANSFORM_THRESHOLD`]).
    ///
    /// Both parts start with `capacity` live slots and a ghost list of
    /// the same size, so the conserved capacity total is `2 * capacity`.
    pub fn new(capacity: usize) -> Self {
        Self::with_threshold(capacity, DEFAULT_TRANSFORM_THRESHOLD)
    }

    /// Creates an adaptive cache promoting keys after
    /// `transform_threshold` hits in the recent part.
    ///
    /// A threshold of 0 is indistinguishable from 1 (the insert itself
    /// counts as the first access);
    /// [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build)
    /// rejects it.
    pub fn with_threshold(capacity: usize, transform_threshold: u64) -> Self {
        Self {
            recent: RecentPart::new(capacity, transform_threshold),
            frequent: FrequentPart::new(capacity),
            capacity,
            transform_threshold,
        }
    }

    /// Configured promotion threshold.
    pub fn transform_threshold(&self) -> u64 {
        self.transform_threshold
    }

    /// Live entries in the recent part.
    pub fn recent_len(&self) -> usize {
        self.recent.len()
    }

    /// Live entries in the frequent part.
    pub fn frequent_len(&self) -> usize {
        self.frequent.len()
    }

    /// Current adapted capacity of the recent part.
    pub fn recent_capacity(&self) -> usize {
        self.recent.capacity
    }

    /// Current adapted capacity of the frequent part.
    pub fn frequent_capacity(&self) -> usize {
        self.frequent.capacity
    }

    /// Ghosts tracked for the recent part.
    pub fn recent_ghost_len(&self) -> usize {
        self.recent.ghost.len()
    }

    /// Ghosts tracked for the frequent part.
    pub fn frequent_ghost_len(&self) -> usize {
        self.frequent.ghost.len()
    }

    /// Ghost check: a hit removes the key from that ghost list and
    /// shifts one unit of capacity toward the part that lost the key.
    /// The recent side wins if both ghosts somehow track the key.
    fn adapt_on_ghost_hit(&mut self, key: &K) {
        if self.recent.check_ghost(key) {
            if self.frequent.decrease_capacity() {
                self.recent.increase_capacity();
            }
        } else if self.frequent.check_ghost(key)
            && self.recent.decrease_capacity()
        {
            self.frequent.increase_capacity();
        }
    }

    /// Non-panicking invariant probe for test harnesses.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.recent.check_invariants()?;
        self.frequent.check_invariants()?;
        if self.recent.capacity + self.frequent.capacity != 2 * self.capacity {
            return Err(InvariantError::new("part capacity total not conserved"));
        }
        if self.recent.ghost.capacity() != self.capacity
            || self.frequent.ghost.capacity() != self.capacity
        {
            return Err(InvariantError::new("ghost capacity drifted"));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.check_invariants().expect("arc invariants violated");
        self.recent.list.debug_validate_invariants();
        self.recent.ghost.debug_validate_invariants();
        self.frequent.meta.debug_validate_invariants();
        self.frequent.ghost.debug_validate_invariants();
    }
}

impl<K, V> std::fmt::Debug for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcCache")
            .field("capacity", &self.capacity)
            .field("recent_len", &self.recent.len())
            .field("recent_capacity", &self.recent.capacity)
            .field("frequent_len", &self.frequent.len())
            .field("frequent_capacity", &self.frequent.capacity)
            .field("recent_ghosts", &self.recent.ghost.len())
            .field("frequent_ghosts", &self.frequent.ghost.len())
            .finish()
    }
}

impl<K, V> ReadOnlyCache<K> for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn contains(&self, key: &K) -> bool {
        self.recent.contains(key) || self.frequent.contains(key)
    }

    /// Distinct keys across both parts. A promoted key lives in both,
    /// so this walks the frequent part and is O(n); use
    /// [`recent_len`](ArcCache::recent_len) /
    /// [`frequent_len`](ArcCache::frequent_len) for O(1) reads.
    fn len(&self) -> usize {
        let shared = self
            .frequent
            .keys()
            .filter(|&key| self.recent.contains(key))
            .count();
        self.recent.len() + self.frequent.len() - shared
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CacheEngine<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.adapt_on_ghost_hit(&key);

        if self.frequent.contains(&key) {
            // Keep both copies in sync.
            let prev = self.recent.put(key.clone(), value.clone());
            let frequent_prev = self.frequent.put(key, value);
            return prev.or(frequent_prev);
        }
        self.recent.put(key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.adapt_on_ghost_hit(key);

        // A recent-side miss is a miss; the frequent part alone cannot
        // serve a get (a later put re-admits the key).
        let should_promote = self.recent.touch(key)?;

        if should_promote
            && let Some(value) = self.recent.peek(key).cloned()
        {
            self.frequent.put(key.clone(), value);
        }

        if self.frequent.contains(key) {
            self.frequent.touch(key);
            return self.frequent.peek(key);
        }
        self.recent.peek(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.frequent
            .peek(key)
            .or_else(|| self.recent.peek(key))
    }

    /// Drops live entries from both parts. Ghost lists and the adapted
    /// part capacities survive, so the engine keeps what it has
    /// learned about the workload.
    fn purge(&mut self) {
        self.recent.purge_live();
        self.frequent.purge_live();
    }
}

/// Thread-safe adaptive cache: one mutex per engine, held for the full
/// duration of each operation.
#[derive(Debug)]
pub struct ConcurrentArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Mutex<ArcCache<K, V>>,
}

impl<K, V> ConcurrentArcCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a thread-safe adaptive cache with the default threshold.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(ArcCache::new(capacity)),
        }
    }

    /// Creates a thread-safe adaptive cache with an explicit threshold.
    pub fn with_threshold(capacity: usize, transform_threshold: u64) -> Self {
        Self {
            inner: Mutex::new(ArcCache::with_threshold(capacity, transform_threshold)),
        }
    }

    /// Inserts or overwrites; returns the previous value on overwrite.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().put(key, value)
    }

    /// Returns a clone of the value and updates both parts' state.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Returns a clone of the value without updating policy state.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    /// Returns `true` if either part holds `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Distinct live keys across both parts (O(n), see [`ArcCache::len`]).
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if no live keys exist.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Drops live entries; keeps ghosts and adapted capacities.
    pub fn purge(&self) {
        self.inner.lock().purge();
    }

    /// Runs `f` with the engine locked, for invariant checks in tests.
    pub fn with_core<R>(&self, f: impl FnOnce(&ArcCache<K, V>) -> R) -> R {
        f(&self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entries_live_in_recent_part() {
        let mut cache = ArcCache::new(4);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.recent_len(), 2);
        assert_eq!(cache.frequent_len(), 0);
        assert_eq!(cache.len(), 2);
        cache.debug_validate_invariants();
    }

    #[test]
    fn promotion_after_threshold_hits() {
        let mut cache = ArcCache::with_threshold(4, 2);
        cache.put("x", 1);
        assert_eq!(cache.frequent_len(), 0);

        // Insert counted as the first access; this hit is the second.
        assert_eq!(cache.get(&"x"), Some(&1));
        assert_eq!(cache.frequent_len(), 1);

        // Served from the frequent part from now on.
        assert_eq!(cache.get(&"x"), Some(&1));
        assert!(cache.contains(&"x"));
        assert_eq!(cache.len(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn higher_threshold_delays_promotion() {
        let mut cache = ArcCache::with_threshold(4, 3);
        cache.put("x", 1);
        cache.get(&"x"); // access 2
        assert_eq!(cache.frequent_len(), 0);
        cache.get(&"x"); // access 3 reaches the threshold
        assert_eq!(cache.frequent_len(), 1);
    }

    #[test]
    fn recent_eviction_fills_ghost() {
        let mut cache = ArcCache::with_threshold(2, 2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        assert!(!cache.contains(&"a"));
        assert_eq!(cache.recent_ghost_len(), 1);
        assert_eq!(cache.recent_len(), 2);
        cache.debug_validate_invariants();
    }

    #[test]
    fn ghost_hit_shifts_capacity_toward_recent() {
        let mut cache = ArcCache::with_threshold(2, 2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3); // evicts "a" into the recent ghost
        assert_eq!(cache.recent_capacity(), 2);
        assert_eq!(cache.frequent_capacity(), 2);

        cache.put("a", 10); // ghost hit
        assert_eq!(cache.recent_capacity(), 3);
        assert_eq!(cache.frequent_capacity(), 1);
        assert!(cache.contains(&"a"));
        assert_eq!(cache.recent_ghost_len(), 0);
        cache.debug_validate_invariants();
    }

    #[test]
    fn ghost_hit_shifts_capacity_toward_frequent() {
        let mut cache: ArcCache<u32, u32> = ArcCache::with_threshold(1, 1);
        cache.put(1, 10);
        cache.get(&1); // promotes into the frequent part (threshold 1)
        assert_eq!(cache.frequent_len(), 1);

        // Overflow the frequent part: promoting key 2 evicts key 1
        // into the frequent ghost.
        cache.put(2, 20);
        cache.get(&2);
        assert_eq!(cache.frequent_ghost_len(), 1);

        // Push key 1 out of the recent ghost so only the frequent
        // ghost still tracks it (the recent ghost wins ties).
        cache.put(3, 30);

        cache.put(1, 11);
        assert_eq!(cache.frequent_capacity(), 2);
        assert_eq!(cache.recent_capacity(), 0);
        cache.debug_validate_invariants();
    }

    #[test]
    fn capacity_total_is_conserved() {
        let mut cache: ArcCache<u32, u32> = ArcCache::with_threshold(3, 2);
        for i in 0..50u32 {
            cache.put(i % 7, i);
            cache.get(&(i % 5));
            assert_eq!(
                cache.recent_capacity() + cache.frequent_capacity(),
                6,
                "capacity leaked at step {i}"
            );
            cache.debug_validate_invariants();
        }
    }

    #[test]
    fn overwrite_syncs_both_parts() {
        let mut cache = ArcCache::with_threshold(4, 2);
        cache.put("k", 1);
        cache.get(&"k"); // promote
        assert_eq!(cache.frequent_len(), 1);

        assert_eq!(cache.put("k", 2), Some(1));
        // Served from the frequent part, which must see the new value.
        assert_eq!(cache.get(&"k"), Some(&2));
        assert_eq!(cache.peek(&"k"), Some(&2));
        cache.debug_validate_invariants();
    }

    #[test]
    fn promoted_key_survives_recent_eviction_for_peek_but_not_get() {
        let mut cache = ArcCache::with_threshold(2, 2);
        cache.put("hot", 1);
        cache.get(&"hot"); // promoted
        cache.put("b", 2);
        cache.put("c", 3); // evicts "hot" from the recent part

        assert!(!cache.recent.contains(&"hot"));
        assert!(cache.frequent.contains(&"hot"));

        // The frequent copy is visible to peek/contains but a get needs
        // the recent part, so it misses until the key is re-admitted.
        assert_eq!(cache.peek(&"hot"), Some(&1));
        assert!(cache.contains(&"hot"));
        assert_eq!(cache.get(&"hot"), None);

        cache.put("hot", 4);
        assert_eq!(cache.get(&"hot"), Some(&4));
        cache.debug_validate_invariants();
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut cache = ArcCache::new(0);
        assert_eq!(cache.put("a", 1), None);
        assert_eq!(cache.get(&"a"), None);
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        cache.debug_validate_invariants();
    }

    #[test]
    fn purge_keeps_ghosts_and_adaptation() {
        let mut cache = ArcCache::with_threshold(2, 2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3); // "a" ghosted
        cache.put("a", 4); // ghost hit: recent 3 / frequent 1
        assert_eq!(cache.recent_capacity(), 3);

        cache.purge();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a"), None);
        // Learned capacities and remaining ghosts survive the purge.
        assert_eq!(cache.recent_capacity(), 3);
        assert_eq!(cache.frequent_capacity(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn decrease_capacity_evicts_when_full() {
        let mut part: RecentPart<u32, u32> = RecentPart::new(2, 2);
        part.put(1, 10);
        part.put(2, 20);
        assert!(part.decrease_capacity());
        assert_eq!(part.len(), 1);
        assert_eq!(part.capacity, 1);
        assert!(part.ghost.contains(&1));

        assert!(part.decrease_capacity());
        assert_eq!(part.capacity, 0);
        assert!(!part.decrease_capacity());
    }

    #[test]
    fn frequent_part_evicts_least_frequent() {
        let mut part: FrequentPart<u32, u32> = FrequentPart::new(2);
        part.put(1, 10);
        part.put(2, 20);
        part.touch(&2);
        part.put(3, 30);

        assert!(!part.contains(&1));
        assert!(part.ghost.contains(&1));
        assert!(part.contains(&2));
        assert!(part.contains(&3));
    }

    #[test]
    fn concurrent_wrapper_basic_ops() {
        let cache = ConcurrentArcCache::with_threshold(4, 2);
        cache.put(1, "one".to_string());
        assert_eq!(cache.get(&1), Some("one".to_string()));
        assert_eq!(cache.get(&1), Some("one".to_string()));
        cache.with_core(|core| {
            assert_eq!(core.frequent_len(), 1);
            core.debug_validate_invariants();
        });
        cache.purge();
        assert!(cache.is_empty());
    }
}
