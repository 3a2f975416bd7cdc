//! Memoized query results.
//!
//! The cache is never authoritative: every entry can be recomputed from the
//! archetypes. Invalidation is deliberately coarse. A mutation touching the
//! types `T` drops every entry whose key shares at least one type with `T`,
//! whether or not the result actually changed.

use hashbrown::HashSet;
use rustc_hash::FxHashMap;

use crate::{entity::Entity, signature::ComponentSet};

/// A set of entities, as returned by queries.
pub type EntitySet = HashSet<Entity>;

/// Counters describing cache behavior since creation or the last reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that had to be computed.
    pub misses: u64,
    /// Entries dropped by invalidation.
    pub invalidations: u64,
    /// Entries currently cached.
    pub entries: usize,
}

/// Query result cache keyed by the exact requested type set.
#[derive(Debug, Default)]
pub struct QueryCache {
    results: FxHashMap<ComponentSet, EntitySet>,
    hits: u64,
    misses: u64,
    invalidations: u64,
}

impl QueryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached result, counting the hit or miss.
    pub fn get(&mut self, key: &ComponentSet) -> Option<&EntitySet> {
        match self.results.get(key) {
            Some(result) => {
                self.hits += 1;
                tracing::trace!(%key, "query cache hit");
                Some(result)
            }
            None => {
                self.misses += 1;
                tracing::trace!(%key, "query cache miss");
                None
            }
        }
    }

    /// Check for an entry without touching the counters.
    #[must_use]
    pub fn contains(&self, key: &ComponentSet) -> bool {
        self.results.contains_key(key)
    }

    /// Store a computed result.
    pub fn insert(&mut self, key: ComponentSet, result: EntitySet) {
        self.results.insert(key, result);
    }

    /// Drop every entry whose key is not disjoint from `touched`.
    ///
    /// Returns the number of dropped entries.
    pub fn invalidate(&mut self, touched: &ComponentSet) -> usize {
        let before = self.results.len();
        self.results.retain(|key, _| key.is_disjoint(touched));
        let dropped = before - self.results.len();

        if dropped > 0 {
            self.invalidations += dropped as u64;
            tracing::trace!(%touched, dropped, "query cache invalidated");
        }
        dropped
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.invalidations += self.results.len() as u64;
        self.results.clear();
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            invalidations: self.invalidations,
            entries: self.results.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentId;

    fn set(raw: &[u32]) -> ComponentSet {
        raw.iter().copied().map(ComponentId::from_raw).collect()
    }

    fn entities(raw: &[u64]) -> EntitySet {
        raw.iter().copied().map(Entity::from_raw).collect()
    }

    #[test]
    fn test_hit_and_miss() {
        let mut cache = QueryCache::new();

        assert!(cache.get(&set(&[1])).is_none());
        cache.insert(set(&[1]), entities(&[10, 11]));
        assert_eq!(cache.get(&set(&[1])), Some(&entities(&[10, 11])));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_invalidation_by_intersection() {
        let mut cache = QueryCache::new();
        cache.insert(set(&[1]), entities(&[1]));
        cache.insert(set(&[1, 2]), entities(&[2]));
        cache.insert(set(&[2, 3]), entities(&[3]));
        cache.insert(set(&[4]), entities(&[4]));

        let dropped = cache.invalidate(&set(&[2]));

        assert_eq!(dropped, 2);
        assert!(cache.contains(&set(&[1])));
        assert!(!cache.contains(&set(&[1, 2])));
        assert!(!cache.contains(&set(&[2, 3])));
        assert!(cache.contains(&set(&[4])));
        assert_eq!(cache.stats().invalidations, 2);
    }

    #[test]
    fn test_invalidate_unrelated_is_noop() {
        let mut cache = QueryCache::new();
        cache.insert(set(&[1]), entities(&[1]));

        assert_eq!(cache.invalidate(&set(&[5, 6])), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = QueryCache::new();
        cache.insert(set(&[1]), entities(&[1]));
        cache.insert(set(&[2]), entities(&[2]));

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations, 2);
    }
}
