//! Memoized diagrams keyed on (cloud, radius, ceiling).
//!
//! The cloud and the radius are the only inputs that invalidate a diagram,
//! so scrubbing back to a radius already visited is a lookup.

use crate::cloud::PointCloud;
use crate::topology::DiagramSet;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Slider positions at the default granularity, plus headroom
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    cloud: u64,
    radius_bits: u64,
    max_dimension: usize,
}

impl CacheKey {
    pub fn new(cloud: &PointCloud, radius: f64, max_dimension: usize) -> Self {
        Self {
            cloud: cloud.fingerprint(),
            radius_bits: radius.to_bits(),
            max_dimension,
        }
    }
}

/// Bounded FIFO cache of computed diagram sets
#[derive(Debug)]
pub struct DiagramCache {
    entries: HashMap<CacheKey, Arc<DiagramSet>>,
    order: VecDeque<CacheKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl DiagramCache {
    /// A capacity of 0 disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached set for `key`, or compute, store and return it.
    /// Errors are never cached.
    pub fn get_or_try_insert<E>(
        &mut self,
        key: CacheKey,
        compute: impl FnOnce() -> Result<DiagramSet, E>,
    ) -> Result<Arc<DiagramSet>, E> {
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(Arc::clone(hit));
        }

        self.misses += 1;
        let value = Arc::new(compute()?);
        self.store(key, Arc::clone(&value));
        Ok(value)
    }

    /// Whether `key` is memoized. Does not count as a hit.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Store a set computed outside the cache, e.g. on a blocking thread.
    /// Counts as a miss.
    pub fn insert(&mut self, key: CacheKey, value: Arc<DiagramSet>) {
        self.misses += 1;
        self.store(key, value);
    }

    fn store(&mut self, key: CacheKey, value: Arc<DiagramSet>) {
        if self.capacity == 0 || self.entries.contains_key(&key) {
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(old) => {
                    self.entries.remove(&old);
                }
                None => break,
            }
        }
        self.entries.insert(key, value);
        self.order.push_back(key);
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

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl Default for DiagramCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::Dataset;

    fn key(radius: f64) -> CacheKey {
        CacheKey::new(&Dataset::Demo2d.load(), radius, 2)
    }

    #[test]
    fn test_hit_skips_computation() {
        let mut cache = DiagramCache::new(4);
        let mut calls = 0;

        for _ in 0..3 {
            let set = cache
                .get_or_try_insert::<()>(key(0.1), || {
                    calls += 1;
                    Ok(DiagramSet::empty(2, 0.2))
                })
                .unwrap();
            assert_eq!(set.threshold, 0.2);
        }

        assert_eq!(calls, 1);
        assert_eq!((cache.hits(), cache.misses()), (2, 1));
    }

    #[test]
    fn test_errors_not_cached() {
        let mut cache = DiagramCache::new(4);
        assert!(cache.get_or_try_insert(key(0.1), || Err("boom")).is_err());
        assert!(cache.is_empty());
        assert!(cache
            .get_or_try_insert::<&str>(key(0.1), || Ok(DiagramSet::empty(2, 0.2)))
            .is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_oldest() {
        let mut cache = DiagramCache::new(2);
        for r in [0.1, 0.2, 0.3] {
            cache
                .get_or_try_insert::<()>(key(r), || Ok(DiagramSet::empty(2, 2.0 * r)))
                .unwrap();
        }
        assert_eq!(cache.len(), 2);

        // 0.1 was evicted, 0.3 is still there
        let mut recomputed = false;
        cache
            .get_or_try_insert::<()>(key(0.1), || {
                recomputed = true;
                Ok(DiagramSet::empty(2, 0.2))
            })
            .unwrap();
        assert!(recomputed);
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn test_insert_then_lookup_is_a_hit() {
        let mut cache = DiagramCache::new(4);
        assert!(!cache.contains(&key(0.1)));
        cache.insert(key(0.1), Arc::new(DiagramSet::empty(2, 0.2)));
        assert!(cache.contains(&key(0.1)));

        let set = cache
            .get_or_try_insert::<()>(key(0.1), || panic!("already cached"))
            .unwrap();
        assert_eq!(set.threshold, 0.2);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_zero_capacity_disables() {
        let mut cache = DiagramCache::new(0);
        cache
            .get_or_try_insert::<()>(key(0.1), || Ok(DiagramSet::empty(2, 0.2)))
            .unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_key_separates_clouds_and_ceilings() {
        let demo2d = Dataset::Demo2d.load();
        let demo3d = Dataset::Demo3d.load();
        assert_ne!(CacheKey::new(&demo2d, 0.1, 2), CacheKey::new(&demo3d, 0.1, 2));
        assert_ne!(CacheKey::new(&demo2d, 0.1, 2), CacheKey::new(&demo2d, 0.1, 1));
        assert_eq!(CacheKey::new(&demo2d, 0.1, 2), CacheKey::new(&demo2d, 0.1, 2));
    }
}
