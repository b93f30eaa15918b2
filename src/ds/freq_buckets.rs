use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Entry<K> {
    key: K,
    freq: u64,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// One per occupied frequency. Entries chain head (oldest) to tail
/// (newest); buckets chain to their occupied neighbors in ascending
/// frequency order.
#[derive(Debug, Default)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    prev: Option<u64>,
    next: Option<u64>,
}

/// Key→frequency tracker with O(1) min-frequency eviction.
///
/// Keys live in per-frequency bucket lists. Within a bucket the head is
/// the oldest arrival and the eviction victim; promoted or newly
/// inserted keys append at the tail. `min_freq == 0` means empty.
#[derive(Debug)]
pub struct FreqBuckets<K> {
    entries: SlotArena<Entry<K>>,
    index: FxHashMap<K, SlotId>,
    buckets: FxHashMap<u64, Bucket>,
    min_freq: u64,
}

impl<K> FreqBuckets<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: SlotArena::new(),
            index: FxHashMap::default(),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| entry.freq)
    }

    /// Smallest occupied frequency, or `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Oldest key at the minimum frequency: the next eviction victim.
    pub fn peek_min(&self) -> Option<(&K, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let id = self.buckets.get(&self.min_freq)?.head?;
        let entry = self.entries.get(id)?;
        Some((&entry.key, entry.freq))
    }

    /// Tracks a new key at frequency 1; `false` if already tracked.
    pub fn insert(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }

        let id = self.entries.insert(Entry {
            key: key.clone(),
            freq: 1,
            prev: None,
            next: None,
        });
        self.index.insert(key, id);

        if !self.buckets.contains_key(&1) {
            let next = if self.min_freq == 0 {
                None
            } else {
                Some(self.min_freq)
            };
            self.insert_bucket(1, None, next);
        }
        self.bucket_push_back(1, id);
        self.min_freq = 1;
        true
    }

    /// Bumps a key's frequency by one; returns the new frequency.
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let freq = self.entries.get(id)?.freq;
        let new_freq = freq.saturating_add(1);
        self.move_entry(id, new_freq);
        Some(new_freq)
    }

    /// Moves a key to an arbitrary frequency (the aging path); returns
    /// the old frequency. Frequencies below 1 are clamped to 1.
    ///
    /// Setting the current frequency refreshes the key to the newest
    /// position within its bucket.
    pub fn set_frequency(&mut self, key: &K, freq: u64) -> Option<u64> {
        let id = *self.index.get(key)?;
        let old = self.entries.get(id)?.freq;
        self.move_entry(id, freq.max(1));
        Some(old)
    }

    /// Stops tracking a key; returns its frequency.
    pub fn remove(&mut self, key: &K) -> Option<u64> {
        let id = self.index.remove(key)?;
        self.detach(id);
        self.entries.remove(id).map(|entry| entry.freq)
    }

    /// Evicts the oldest key at the minimum frequency.
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let id = self.buckets.get(&self.min_freq)?.head?;
        self.detach(id);
        let entry = self.entries.remove(id)?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.freq))
    }

    /// Iterates `(key, frequency)` pairs in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(_, entry)| (&entry.key, entry.freq))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    /// Unlinks `id` from its bucket, dropping the bucket if emptied and
    /// keeping `min_freq` current. The entry stays in the arena.
    fn detach(&mut self, id: SlotId) {
        let freq = match self.entries.get(id) {
            Some(entry) => entry.freq,
            None => return,
        };
        let (prev, next) = self.bucket_neighbors(freq);
        self.bucket_unlink(freq, id);
        if self.bucket_is_empty(freq) {
            self.remove_bucket(freq, prev, next);
            if self.min_freq == freq {
                self.min_freq = next.unwrap_or(0);
            }
        }
    }

    fn move_entry(&mut self, id: SlotId, new_freq: u64) {
        let old_freq = match self.entries.get(id) {
            Some(entry) => entry.freq,
            None => return,
        };

        if old_freq == new_freq {
            // Refresh to newest among equals.
            self.bucket_unlink(old_freq, id);
            self.bucket_push_back(old_freq, id);
            return;
        }

        let (old_prev, old_next) = self.bucket_neighbors(old_freq);
        self.bucket_unlink(old_freq, id);
        let old_removed = self.bucket_is_empty(old_freq);
        if old_removed {
            self.remove_bucket(old_freq, old_prev, old_next);
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.freq = new_freq;
        }

        if !self.buckets.contains_key(&new_freq) {
            // Splice a new bucket in order, walking from the old position.
            let (mut left, mut right) = if old_removed {
                (old_prev, old_next)
            } else if new_freq > old_freq {
                (Some(old_freq), old_next)
            } else {
                (old_prev, Some(old_freq))
            };
            if new_freq > old_freq {
                while let Some(r) = right
                    && r < new_freq
                {
                    left = Some(r);
                    right = self.buckets[&r].next;
                }
            } else {
                while let Some(l) = left
                    && l > new_freq
                {
                    right = Some(l);
                    left = self.buckets[&l].prev;
                }
            }
            self.insert_bucket(new_freq, left, right);
        }
        self.bucket_push_back(new_freq, id);

        if self.min_freq == 0 || new_freq < self.min_freq {
            self.min_freq = new_freq;
        } else if old_removed && self.min_freq == old_freq {
            self.min_freq = match old_next {
                Some(next) => next.min(new_freq),
                None => new_freq,
            };
        }
    }

    fn bucket_neighbors(&self, freq: u64) -> (Option<u64>, Option<u64>) {
        match self.buckets.get(&freq) {
            Some(bucket) => (bucket.prev, bucket.next),
            None => (None, None),
        }
    }

    fn bucket_is_empty(&self, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .map(|bucket| bucket.head.is_none())
            .unwrap_or(true)
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev,
                next,
            },
        );
        if let Some(prev) = prev
            && let Some(bucket) = self.buckets.get_mut(&prev)
        {
            bucket.next = Some(freq);
        }
        if let Some(next) = next
            && let Some(bucket) = self.buckets.get_mut(&next)
        {
            bucket.prev = Some(freq);
        }
    }

    fn remove_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev) = prev
            && let Some(bucket) = self.buckets.get_mut(&prev)
        {
            bucket.next = next;
        }
        if let Some(next) = next
            && let Some(bucket) = self.buckets.get_mut(&next)
        {
            bucket.prev = prev;
        }
        self.buckets.remove(&freq);
    }

    fn bucket_push_back(&mut self, freq: u64, id: SlotId) {
        let bucket = self.buckets.get_mut(&freq).expect("bucket missing");
        let old_tail = bucket.tail;
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = old_tail;
            entry.next = None;
        }
        match old_tail {
            Some(tail) => {
                if let Some(entry) = self.entries.get_mut(tail) {
                    entry.next = Some(id);
                }
            },
            None => bucket.head = Some(id),
        }
        bucket.tail = Some(id);
    }

    fn bucket_unlink(&mut self, freq: u64, id: SlotId) {
        let (prev, next) = match self.entries.get(id) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        let bucket = match self.buckets.get_mut(&freq) {
            Some(bucket) => bucket,
            None => return,
        };
        match prev {
            Some(prev_id) => {
                if let Some(entry) = self.entries.get_mut(prev_id) {
                    entry.next = next;
                }
            },
            None => bucket.head = next,
        }
        match next {
            Some(next_id) => {
                if let Some(entry) = self.entries.get_mut(next_id) {
                    entry.prev = prev;
                }
            },
            None => bucket.tail = prev,
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.len(), self.index.len());

        if self.is_empty() {
            assert!(self.buckets.is_empty());
            assert_eq!(self.min_freq, 0);
            return;
        }

        assert!(self.min_freq > 0);
        assert!(self.buckets.contains_key(&self.min_freq));

        let mut chained = 0usize;
        for (&freq, bucket) in &self.buckets {
            assert!(bucket.head.is_some());
            assert!(bucket.tail.is_some());
            if let Some(prev) = bucket.prev {
                assert!(prev < freq);
                assert_eq!(self.buckets[&prev].next, Some(freq));
            } else {
                assert_eq!(self.min_freq, freq);
            }
            if let Some(next) = bucket.next {
                assert!(next > freq);
                assert_eq!(self.buckets[&next].prev, Some(freq));
            }

            let mut current = bucket.head;
            let mut last = None;
            while let Some(id) = current {
                let entry = self.entries.get(id).expect("bucket entry missing");
                assert_eq!(entry.freq, freq);
                assert_eq!(entry.prev, last);
                assert_eq!(self.index.get(&entry.key), Some(&id));
                last = Some(id);
                current = entry.next;
                chained += 1;
                assert!(chained <= self.len());
            }
            assert_eq!(bucket.tail, last);
        }
        assert_eq!(chained, self.len());
    }
}

impl<K> Default for FreqBuckets<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
