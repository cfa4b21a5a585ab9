//! Bounded caches for remotely resolved state.

use core::hash::Hash;
use core::num::NonZeroUsize;
use primitives::HashMap;
use std::collections::VecDeque;

/// Eviction policy for the fork caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CachePolicy {
    /// Least-recently-used with the given capacity; reads and inserts both
    /// refresh recency.
    Lru(usize),
    /// First-in-first-out with the given capacity; eviction follows
    /// insertion order only.
    Fifo(usize),
    /// No eviction. Only sensible for tests and small workloads.
    Unbounded,
}

/// A key/value cache with a selectable eviction policy.
pub struct ForkCache<K: Hash + Eq, V> {
    inner: Inner<K, V>,
}

impl<K: Hash + Eq, V> core::fmt::Debug for ForkCache<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let policy = match &self.inner {
            Inner::Lru(_) => "lru",
            Inner::Fifo { .. } => "fifo",
            Inner::Unbounded(_) => "unbounded",
        };
        f.debug_struct("ForkCache")
            .field("policy", &policy)
            .field("len", &self.len())
            .finish()
    }
}

enum Inner<K: Hash + Eq, V> {
    Lru(lru::LruCache<K, V>),
    Fifo {
        map: HashMap<K, V>,
        order: VecDeque<K>,
        capacity: usize,
    },
    Unbounded(HashMap<K, V>),
}

impl<K: Hash + Eq + Clone, V> ForkCache<K, V> {
    /// Creates a cache with the given policy. Zero capacities are bumped to
    /// one entry.
    pub fn new(policy: CachePolicy) -> Self {
        let inner = match policy {
            CachePolicy::Lru(capacity) => Inner::Lru(lru::LruCache::new(
                NonZeroUsize::new(capacity.max(1)).unwrap(),
            )),
            CachePolicy::Fifo(capacity) => Inner::Fifo {
                map: HashMap::default(),
                order: VecDeque::new(),
                capacity: capacity.max(1),
            },
            CachePolicy::Unbounded => Inner::Unbounded(HashMap::default()),
        };
        Self { inner }
    }

    /// Looks a key up. Under LRU this refreshes the entry's recency.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            Inner::Lru(cache) => cache.get(key),
            Inner::Fifo { map, .. } => map.get(key),
            Inner::Unbounded(map) => map.get(key),
        }
    }

    /// Returns `true` if the key is cached, without touching recency.
    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            Inner::Lru(cache) => cache.contains(key),
            Inner::Fifo { map, .. } => map.contains_key(key),
            Inner::Unbounded(map) => map.contains_key(key),
        }
    }

    /// Inserts a value, evicting per policy when over capacity.
    pub fn insert(&mut self, key: K, value: V) {
        match &mut self.inner {
            Inner::Lru(cache) => {
                cache.put(key, value);
            }
            Inner::Fifo {
                map,
                order,
                capacity,
            } => {
                if map.insert(key.clone(), value).is_none() {
                    order.push_back(key);
                    while order.len() > *capacity {
                        if let Some(evicted) = order.pop_front() {
                            map.remove(&evicted);
                        }
                    }
                }
            }
            Inner::Unbounded(map) => {
                map.insert(key, value);
            }
        }
    }

}

impl<K: Hash + Eq, V> ForkCache<K, V> {
    /// Number of cached entries.
    pub fn len(&self) -> usize {
        match &self.inner {
            Inner::Lru(cache) => cache.len(),
            Inner::Fifo { map, .. } => map.len(),
            Inner::Unbounded(map) => map.len(),
        }
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lru_reorders_on_read() {
        let mut cache = ForkCache::new(CachePolicy::Lru(2));
        cache.insert(1, "a");
        cache.insert(2, "b");
        // Touch 1 so that 2 becomes the eviction candidate.
        assert_eq!(cache.get(&1), Some(&"a"));
        cache.insert(3, "c");
        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
        assert!(cache.contains(&3));
    }

    #[test]
    fn fifo_ignores_reads() {
        let mut cache = ForkCache::new(CachePolicy::Fifo(2));
        cache.insert(1, "a");
        cache.insert(2, "b");
        assert_eq!(cache.get(&1), Some(&"a"));
        cache.insert(3, "c");
        // 1 was read but still evicts first: insertion order only.
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
    }

    #[test]
    fn fifo_overwrite_keeps_position() {
        let mut cache = ForkCache::new(CachePolicy::Fifo(2));
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(1, "a2");
        cache.insert(3, "c");
        assert!(!cache.contains(&1));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));
    }

    #[test]
    fn unbounded_grows() {
        let mut cache = ForkCache::new(CachePolicy::Unbounded);
        for i in 0..1000 {
            cache.insert(i, i);
        }
        assert_eq!(cache.len(), 1000);
        assert!(cache.contains(&0));
    }
}
