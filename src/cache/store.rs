//! Caller-owned result store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::fingerprint::Fingerprint;

/// Hit/miss counters since the cache was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Memoizes pure computations by [`Fingerprint`].
///
/// Holds at most one entry per fingerprint, and entries are immutable once
/// written. There is no single-flight: two threads missing on the same key
/// both compute, and the first to finish wins. Errors are never stored.
/// Eviction is left to the owner (`evict`, `retain`, `clear`).
pub struct ResultCache<V> {
    entries: RwLock<HashMap<Fingerprint, Arc<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> ResultCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached value for `key`, or run `compute` and store its result.
    ///
    /// The lock is not held while `compute` runs.
    pub fn get_or_compute<E, F>(&self, key: Fingerprint, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::debug!("cache hit {:?}", key);
            return Ok(hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        log::debug!("cache miss {:?}", key);

        let value = Arc::new(compute()?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(key).or_insert(value)))
    }

    /// Look up without computing. Does not touch the hit/miss counters.
    pub fn get(&self, key: &Fingerprint) -> Option<Arc<V>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Store `value` unless an entry already exists; returns the stored entry.
    pub fn insert(&self, key: Fingerprint, value: V) -> Arc<V> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key).or_insert_with(|| Arc::new(value)))
    }

    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Remove one entry, returning it if present.
    pub fn evict(&self, key: &Fingerprint) -> Option<Arc<V>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    /// Keep only entries whose fingerprint satisfies `keep`.
    pub fn retain(&self, mut keep: impl FnMut(&Fingerprint) -> bool) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|key, _| keep(key));
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl<V> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FingerprintBuilder;

    fn key(name: &str) -> Fingerprint {
        FingerprintBuilder::new("test").str(name).finish()
    }

    #[test]
    fn test_second_call_is_a_hit() {
        let cache: ResultCache<u32> = ResultCache::new();
        let mut calls = 0;
        let first = cache
            .get_or_compute(key("a"), || {
                calls += 1;
                Ok::<_, ()>(7)
            })
            .unwrap();
        let second = cache
            .get_or_compute(key("a"), || {
                calls += 1;
                Ok::<_, ()>(8)
            })
            .unwrap();
        assert_eq!(*first, 7);
        assert_eq!(*second, 7);
        assert_eq!(calls, 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn test_errors_not_cached() {
        let cache: ResultCache<u32> = ResultCache::new();
        let err = cache.get_or_compute(key("a"), || Err::<u32, _>("boom"));
        assert!(err.is_err());
        assert!(cache.is_empty());
        let ok = cache.get_or_compute(key("a"), || Ok::<_, &str>(1)).unwrap();
        assert_eq!(*ok, 1);
    }

    #[test]
    fn test_insert_keeps_first_writer() {
        let cache = ResultCache::new();
        assert_eq!(*cache.insert(key("a"), "first"), "first");
        assert_eq!(*cache.insert(key("a"), "second"), "first");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evict_retain_clear() {
        let cache = ResultCache::new();
        cache.insert(key("a"), 1);
        cache.insert(key("b"), 2);
        cache.insert(key("c"), 3);

        assert_eq!(cache.evict(&key("a")).as_deref(), Some(&1));
        assert!(cache.evict(&key("a")).is_none());

        let keep = key("b");
        cache.retain(|k| *k == keep);
        assert!(cache.contains(&key("b")));
        assert!(!cache.contains(&key("c")));

        cache.clear();
        assert!(cache.is_empty());
    }
}
