//! The uniform policy contract.
//!
//! Every engine in this crate (recency baseline, aging LFU, adaptive
//! two-part ARC) exposes the same surface, so a host can hold "a
//! cache" and swap the policy at construction time:
//!
//! ```text
//!        ┌──────────────────────────────────┐
//!        │        ReadOnlyCache<K>          │
//!        │  contains / len / capacity       │
//!        └───────────────┬──────────────────┘
//!                        │
//!        ┌───────────────▼──────────────────┐
//!        │        CacheEngine<K, V>         │
//!        │  put / get / peek / purge        │
//!        └──────────────────────────────────┘
//!            ▲            ▲            ▲
//!         LruCore   AgingLfuCache   ArcCache
//! ```
//!
//! Misses are ordinary results, never errors: `get` on an absent key is
//! `None`, a `put` at `capacity == 0` is a silent no-op, overwriting is
//! a defined update. Internal invariant violations are programming
//! errors and panic (debug builds assert them aggressively); they are
//! never surfaced as recoverable errors.

/// Read-only view shared by every cache engine.
pub trait ReadOnlyCache<K> {
    /// Returns `true` if `key` is live, without touching policy state.
    fn contains(&self, key: &K) -> bool;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no live entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of live entries. Zero disables writes.
    fn capacity(&self) -> usize;
}

/// The uniform mutating contract implemented by every policy engine.
///
/// Operations on one engine value are serial by construction (`&mut
/// self`); the `Concurrent*` wrappers add a single mutex per engine for
/// linearizable shared access.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::{CacheEngine, ReadOnlyCache};
///
/// fn warm<C: CacheEngine<u64, String>>(cache: &mut C, rows: &[(u64, String)]) {
///     for (key, value) in rows {
///         cache.put(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCore::new(16);
/// warm(&mut cache, &[(1, "one".into()), (2, "two".into())]);
/// assert_eq!(cache.len(), 2);
/// assert_eq!(cache.get(&1), Some(&"one".to_string()));
/// ```
pub trait CacheEngine<K, V>: ReadOnlyCache<K> {
    /// Inserts or overwrites; returns the previous value on overwrite.
    ///
    /// Counts as an access for policy accounting and triggers at most
    /// one eviction. With `capacity == 0` this is a no-op.
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the value and updates policy state on a hit.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns the value without updating policy state.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Drops all live entries.
    ///
    /// Engine-specific adaptation state may survive: the ARC engine
    /// keeps its ghost lists and learned part capacities across a
    /// purge (documented on [`ArcCache`](crate::policy::arc::ArcCache)).
    fn purge(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal engine to pin down the contract's defaults and
    // object-safety-free generic use.
    struct TinyCache {
        slot: Option<(u32, String)>,
        capacity: usize,
    }

    impl ReadOnlyCache<u32> for TinyCache {
        fn contains(&self, key: &u32) -> bool {
            matches!(&self.slot, Some((k, _)) if k == key)
        }

        fn len(&self) -> usize {
            usize::from(self.slot.is_some())
        }

        fn capacity(&self) -> usize {
            self.capacity
        }
    }

    impl CacheEngine<u32, String> for TinyCache {
        fn put(&mut self, key: u32, value: String) -> Option<String> {
            if self.capacity == 0 {
                return None;
            }
            match self.slot.take() {
                Some((k, old)) if k == key => {
                    self.slot = Some((key, value));
                    Some(old)
                },
                _ => {
                    self.slot = Some((key, value));
                    None
                },
            }
        }

        fn get(&mut self, key: &u32) -> Option<&String> {
            self.peek(key)
        }

        fn peek(&self, key: &u32) -> Option<&String> {
            match &self.slot {
                Some((k, v)) if k == key => Some(v),
                _ => None,
            }
        }

        fn purge(&mut self) {
            self.slot = None;
        }
    }

    #[test]
    fn is_empty_tracks_len() {
        let mut cache = TinyCache {
            slot: None,
            capacity: 1,
        };
        assert!(cache.is_empty());
        cache.put(1, "x".into());
        assert!(!cache.is_empty());
    }

    #[test]
    fn put_returns_previous_value_on_overwrite() {
        let mut cache = TinyCache {
            slot: None,
            capacity: 1,
        };
        assert_eq!(cache.put(1, "a".into()), None);
        assert_eq!(cache.put(1, "b".into()), Some("a".to_string()));
    }

    #[test]
    fn zero_capacity_rejects_writes() {
        let mut cache = TinyCache {
            slot: None,
            capacity: 0,
        };
        assert_eq!(cache.put(1, "a".into()), None);
        assert_eq!(cache.get(&1), None);
        assert!(cache.is_empty());
    }
}
