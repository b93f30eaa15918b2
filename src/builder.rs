//! Unified cache builder for all eviction policies.
//!
//! A host that wants "a cache" without committing to a concrete engine
//! type selects the policy at construction and gets a [`Cache`] with
//! the uniform `put`/`get`/`peek`/`purge` surface:
//!
//! ```
//! use evictkit::builder::{CacheBuilder, EvictionPolicy};
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>(EvictionPolicy::Lru);
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```
//!
//! [`CacheBuilder::try_build`] validates policy parameters and returns
//! a [`ConfigError`] instead of silently accepting degenerate settings.

use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::arc::ArcCache;
use crate::policy::lfu::AgingLfuCache;
use crate::policy::lru::LruCore;
use crate::traits::{CacheEngine, ReadOnlyCache};

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Least Recently Used eviction.
    Lru,
    /// Least Frequently Used eviction with frequency aging; ages once
    /// the mean access frequency exceeds `max_average`.
    Lfu { max_average: u64 },
    /// Adaptive two-part engine; promotes a key into the frequent part
    /// after `transform_threshold` hits in the recent part.
    Arc { transform_threshold: u64 },
}

/// Uniform cache wrapper dispatching to the selected engine.
#[derive(Debug)]
pub struct Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    inner: CacheInner<K, V>,
}

#[derive(Debug)]
enum CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    Lru(LruCore<K, V>),
    Lfu(AgingLfuCache<K, V>),
    Arc(ArcCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Inserts or overwrites; returns the previous value on overwrite.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.put(key, value),
            CacheInner::Lfu(lfu) => lfu.put(key, value),
            CacheInner::Arc(arc) => arc.put(key, value),
        }
    }

    /// Returns the value and updates policy state on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.get(key),
            CacheInner::Lfu(lfu) => lfu.get(key),
            CacheInner::Arc(arc) => arc.get(key),
        }
    }

    /// Returns the value without updating policy state.
    pub fn peek(&self, key: &K) -> Option<&V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.peek(key),
            CacheInner::Lfu(lfu) => lfu.peek(key),
            CacheInner::Arc(arc) => arc.peek(key),
        }
    }

    /// Returns `true` if `key` is live.
    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.contains(key),
            CacheInner::Lfu(lfu) => lfu.contains(key),
            CacheInner::Arc(arc) => arc.contains(key),
        }
    }

    /// Number of live entries (O(n) for the adaptive policy).
    pub fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.len(),
            CacheInner::Lfu(lfu) => lfu.len(),
            CacheInner::Arc(arc) => arc.len(),
        }
    }

    /// Returns `true` if the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.capacity(),
            CacheInner::Lfu(lfu) => lfu.capacity(),
            CacheInner::Arc(arc) => arc.capacity(),
        }
    }

    /// Drops all live entries.
    pub fn purge(&mut self) {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.purge(),
            CacheInner::Lfu(lfu) => lfu.purge(),
            CacheInner::Arc(arc) => arc.purge(),
        }
    }
}

/// Builder for creating cache instances.
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Creates a builder for caches of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a cache with the selected policy.
    ///
    /// Degenerate policy parameters are accepted as-is; use
    /// [`try_build`](Self::try_build) to have them validated.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::builder::{CacheBuilder, EvictionPolicy};
    ///
    /// let mut lfu = CacheBuilder::new(64)
    ///     .build::<u64, u64>(EvictionPolicy::Lfu { max_average: 10 });
    /// lfu.put(1, 100);
    /// assert_eq!(lfu.get(&1), Some(&100));
    ///
    /// let arc = CacheBuilder::new(64)
    ///     .build::<u64, u64>(EvictionPolicy::Arc { transform_threshold: 2 });
    /// assert_eq!(arc.capacity(), 64);
    /// ```
    pub fn build<K, V>(self, policy: EvictionPolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let inner = match policy {
            EvictionPolicy::Lru => CacheInner::Lru(LruCore::new(self.capacity)),
            EvictionPolicy::Lfu { max_average } => {
                CacheInner::Lfu(AgingLfuCache::with_max_average(self.capacity, max_average))
            },
            EvictionPolicy::Arc {
                transform_threshold,
            } => CacheInner::Arc(ArcCache::with_threshold(
                self.capacity,
                transform_threshold,
            )),
        };
        Cache { inner }
    }

    /// Builds a cache after validating policy parameters.
    ///
    /// - `Lfu`: `max_average` must be at least 2, otherwise the aging
    ///   step `max_average / 2` is zero and aging never forgets.
    /// - `Arc`: `transform_threshold` must be at least 1.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::builder::{CacheBuilder, EvictionPolicy};
    ///
    /// let bad = CacheBuilder::new(16)
    ///     .try_build::<u64, u64>(EvictionPolicy::Lfu { max_average: 1 });
    /// assert!(bad.is_err());
    ///
    /// let ok = CacheBuilder::new(16)
    ///     .try_build::<u64, u64>(EvictionPolicy::Lfu { max_average: 10 });
    /// assert!(ok.is_ok());
    /// ```
    pub fn try_build<K, V>(self, policy: EvictionPolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        match policy {
            EvictionPolicy::Lfu { max_average } if max_average < 2 => {
                return Err(ConfigError::new("max_average must be at least 2"));
            },
            EvictionPolicy::Arc {
                transform_threshold,
            } if transform_threshold < 1 => {
                return Err(ConfigError::new("transform_threshold must be at least 1"));
            },
            _ => {},
        }
        Ok(self.build(policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_policies() -> [EvictionPolicy; 3] {
        [
            EvictionPolicy::Lru,
            EvictionPolicy::Lfu { max_average: 10 },
            EvictionPolicy::Arc {
                transform_threshold: 2,
            },
        ]
    }

    #[test]
    fn all_policies_share_the_contract() {
        for policy in all_policies() {
            let mut cache = CacheBuilder::new(10).build::<u64, String>(policy);

            assert_eq!(cache.put(1, "one".to_string()), None);
            assert_eq!(cache.put(2, "two".to_string()), None);

            assert_eq!(cache.get(&1), Some(&"one".to_string()));
            assert_eq!(cache.get(&3), None);

            assert!(cache.contains(&1));
            assert!(!cache.contains(&99));
            assert_eq!(cache.len(), 2);
            assert_eq!(cache.capacity(), 10);

            assert_eq!(
                cache.put(1, "ONE".to_string()),
                Some("one".to_string()),
                "{policy:?}"
            );
            assert_eq!(cache.peek(&1), Some(&"ONE".to_string()));

            cache.purge();
            assert!(cache.is_empty());
            assert_eq!(cache.get(&1), None);
        }
    }

    #[test]
    fn all_policies_honor_capacity() {
        for policy in all_policies() {
            let mut cache = CacheBuilder::new(2).build::<u64, u64>(policy);
            for i in 0..10 {
                cache.put(i, i);
            }
            assert!(cache.len() <= 2, "{policy:?}");
        }
    }

    #[test]
    fn all_policies_reject_writes_at_zero_capacity() {
        for policy in all_policies() {
            let mut cache = CacheBuilder::new(0).build::<u64, u64>(policy);
            cache.put(1, 1);
            assert_eq!(cache.get(&1), None, "{policy:?}");
            assert!(cache.is_empty());
        }
    }

    #[test]
    fn try_build_validates_parameters() {
        assert!(
            CacheBuilder::new(4)
                .try_build::<u64, u64>(EvictionPolicy::Lfu { max_average: 1 })
                .is_err()
        );
        assert!(
            CacheBuilder::new(4)
                .try_build::<u64, u64>(EvictionPolicy::Arc {
                    transform_threshold: 0
                })
                .is_err()
        );
        assert!(
            CacheBuilder::new(4)
                .try_build::<u64, u64>(EvictionPolicy::Lru)
                .is_ok()
        );
    }
}
