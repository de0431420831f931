//! The memoisation layer: TTL expiry, single-flight, statistics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::CacheError;
use crate::fingerprint::Fingerprint;
use crate::store::{CacheEntry, CacheStore, MemoryStore};

/// Usage counters accumulated since construction or the last reset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CacheStats {
    /// Lookups served from the store.
    pub hit_count: u64,
    /// Lookups that had to compute.
    pub miss_count: u64,
    /// `hit_count / (hit_count + miss_count)`; 0 when both are 0.
    pub hit_rate: f64,
    /// Entries currently stored (best effort; 0 when the backend cannot
    /// report).
    pub entries: usize,
}

/// Fingerprint-keyed memoisation over a pluggable backend.
///
/// Wraps a [`CacheStore`] with:
/// - TTL expiry, evaluated lazily on lookup (an entry is expired once its
///   age reaches the TTL, so a zero TTL expires immediately),
/// - single-flight on concurrent misses for the same key: one caller
///   computes, waiters reuse its entry,
/// - monotonically accumulated hit/miss counters,
/// - degrade-on-failure: every backend error is logged and answered by
///   computing directly.
///
/// Entries are independent; there is no cross-key locking.
pub struct ResultCache<V, S = MemoryStore<V>>
where
    S: CacheStore<V>,
{
    store: S,
    hits: AtomicU64,
    misses: AtomicU64,
    inflight: Mutex<HashMap<Fingerprint, Arc<Mutex<()>>>>,
    _marker: std::marker::PhantomData<fn() -> V>,
}

impl<V: Clone + Send + Sync> ResultCache<V, MemoryStore<V>> {
    /// Creates a cache over a fresh in-process store.
    pub fn in_memory() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl<V, S> ResultCache<V, S>
where
    V: Clone,
    S: CacheStore<V>,
{
    /// Creates a cache over the given backend.
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            inflight: Mutex::new(HashMap::new()),
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the cached value for `key` if present and younger than
    /// `ttl`, else invokes `compute`, stores its result, and returns it.
    ///
    /// The boolean is `true` when the value came from the store. Errors
    /// from `compute` propagate unchanged; errors from the backend never
    /// propagate, the layer logs them and computes directly instead.
    pub fn get_or_compute<F, E>(
        &self,
        key: &Fingerprint,
        ttl: Duration,
        compute: F,
    ) -> Result<(V, bool), E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        self.get_or_compute_at(Instant::now(), key, ttl, compute)
    }

    /// Clock-injected variant of [`ResultCache::get_or_compute`], used by
    /// tests to cross TTL boundaries without sleeping.
    fn get_or_compute_at<F, E>(
        &self,
        now: Instant,
        key: &Fingerprint,
        ttl: Duration,
        compute: F,
    ) -> Result<(V, bool), E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        match self.lookup(key, now, ttl) {
            Ok(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok((value, true));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(key = key.as_str(), error = %err, "cache lookup failed, computing directly");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return compute().map(|value| (value, false));
            }
        }

        // Miss: serialise computations for this key. Waiters re-check the
        // store once the winner releases the gate. A poisoned gate map
        // degrades to redundant computation, which is idempotent by the
        // key's construction.
        let gate = self.gate(key);
        let _held = match gate {
            Some(ref gate) => gate.lock().ok(),
            None => None,
        };

        if let Ok(Some(value)) = self.lookup(key, now, ttl) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            self.release_gate(key);
            return Ok((value, true));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = match compute() {
            Ok(value) => value,
            Err(err) => {
                self.release_gate(key);
                return Err(err);
            }
        };
        if let Err(err) = self.store.put(key.clone(), CacheEntry::new(value.clone(), now)) {
            tracing::warn!(key = key.as_str(), error = %err, "cache put failed, result returned uncached");
        }
        self.release_gate(key);
        Ok((value, false))
    }

    /// Evicts a single key.
    pub fn invalidate(&self, key: &Fingerprint) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Evicts every entry. Statistics are unaffected.
    pub fn invalidate_all(&self) -> Result<(), CacheError> {
        self.store.clear()
    }

    /// Current usage counters.
    pub fn stats(&self) -> CacheStats {
        let hit_count = self.hits.load(Ordering::Relaxed);
        let miss_count = self.misses.load(Ordering::Relaxed);
        let lookups = hit_count + miss_count;
        CacheStats {
            hit_count,
            miss_count,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hit_count as f64 / lookups as f64
            },
            entries: self.store.len().unwrap_or(0),
        }
    }

    /// Resets the hit/miss counters to zero.
    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Fresh-entry lookup with lazy eviction of expired entries.
    fn lookup(&self, key: &Fingerprint, now: Instant, ttl: Duration) -> Result<Option<V>, CacheError> {
        match self.store.get(key)? {
            Some(entry) if entry.age(now) < ttl => {
                if let Err(err) = self.store.touch(key, now) {
                    tracing::debug!(key = key.as_str(), error = %err, "cache touch failed");
                }
                Ok(Some(entry.value))
            }
            Some(_) => {
                // Expired: evict lazily, then report a miss.
                self.store.delete(key)?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn gate(&self, key: &Fingerprint) -> Option<Arc<Mutex<()>>> {
        let mut inflight = self.inflight.lock().ok()?;
        Some(inflight.entry(key.clone()).or_default().clone())
    }

    fn release_gate(&self, key: &Fingerprint) {
        if let Ok(mut inflight) = self.inflight.lock() {
            inflight.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn key(s: &str) -> Fingerprint {
        Fingerprint::from_raw(s)
    }

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_miss_then_hit() {
        let cache: ResultCache<u64> = ResultCache::in_memory();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(7)
        };

        let (value, hit) = cache.get_or_compute(&key("k"), MINUTE, compute).unwrap();
        assert_eq!((value, hit), (7, false));

        let (value, hit) = cache
            .get_or_compute(&key("k"), MINUTE, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(7)
            })
            .unwrap();
        assert_eq!((value, hit), (7, true));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_ttl_is_always_expired() {
        let cache: ResultCache<u64> = ResultCache::in_memory();
        let (_, hit) = cache
            .get_or_compute(&key("k"), Duration::ZERO, || Ok::<_, String>(1))
            .unwrap();
        assert!(!hit);
        let (_, hit) = cache
            .get_or_compute(&key("k"), Duration::ZERO, || Ok::<_, String>(1))
            .unwrap();
        assert!(!hit);
        assert_eq!(cache.stats().miss_count, 2);
    }

    #[test]
    fn test_ttl_boundary() {
        let cache: ResultCache<u64> = ResultCache::in_memory();
        let t0 = Instant::now();
        let ttl = Duration::from_secs(100);
        let epsilon = Duration::from_millis(1);

        cache
            .get_or_compute_at(t0, &key("k"), ttl, || Ok::<_, String>(1))
            .unwrap();

        // Just inside the TTL: hit.
        let (_, hit) = cache
            .get_or_compute_at(t0 + ttl - epsilon, &key("k"), ttl, || Ok::<_, String>(2))
            .unwrap();
        assert!(hit);

        // Just past the TTL: miss and recompute.
        let (value, hit) = cache
            .get_or_compute_at(t0 + ttl + epsilon, &key("k"), ttl, || Ok::<_, String>(2))
            .unwrap();
        assert!(!hit);
        assert_eq!(value, 2);
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let cache: ResultCache<u64> = ResultCache::in_memory();
        cache.get_or_compute(&key("k"), MINUTE, || Ok::<_, String>(1)).unwrap();
        cache.invalidate(&key("k")).unwrap();
        let (_, hit) = cache.get_or_compute(&key("k"), MINUTE, || Ok::<_, String>(1)).unwrap();
        assert!(!hit);
    }

    #[test]
    fn test_invalidate_all() {
        let cache: ResultCache<u64> = ResultCache::in_memory();
        cache.get_or_compute(&key("a"), MINUTE, || Ok::<_, String>(1)).unwrap();
        cache.get_or_compute(&key("b"), MINUTE, || Ok::<_, String>(2)).unwrap();
        assert_eq!(cache.stats().entries, 2);
        cache.invalidate_all().unwrap();
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_stats() {
        let cache: ResultCache<u64> = ResultCache::in_memory();
        let empty = cache.stats();
        assert_eq!(empty.hit_rate, 0.0);
        assert_eq!(empty.hit_count, 0);

        cache.get_or_compute(&key("k"), MINUTE, || Ok::<_, String>(1)).unwrap();
        cache.get_or_compute(&key("k"), MINUTE, || Ok::<_, String>(1)).unwrap();
        cache.get_or_compute(&key("k"), MINUTE, || Ok::<_, String>(1)).unwrap();

        let stats = cache.stats();
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 2);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(stats.entries, 1);

        cache.reset_stats();
        assert_eq!(cache.stats().hit_count, 0);
        // Entries survive a stats reset.
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_compute_error_propagates_and_caches_nothing() {
        let cache: ResultCache<u64> = ResultCache::in_memory();
        let result = cache.get_or_compute(&key("k"), MINUTE, || Err::<u64, _>("boom".to_string()));
        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(cache.stats().entries, 0);

        // The key is usable afterwards.
        let (value, hit) = cache.get_or_compute(&key("k"), MINUTE, || Ok::<_, String>(5)).unwrap();
        assert_eq!((value, hit), (5, false));
    }

    /// A backend that fails every operation, standing in for an
    /// unreachable remote store.
    struct BrokenStore;

    impl CacheStore<u64> for BrokenStore {
        fn put(&self, _: Fingerprint, _: CacheEntry<u64>) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }
        fn get(&self, _: &Fingerprint) -> Result<Option<CacheEntry<u64>>, CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }
        fn touch(&self, _: &Fingerprint, _: Instant) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }
        fn delete(&self, _: &Fingerprint) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }
        fn clear(&self) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }
        fn len(&self) -> Result<usize, CacheError> {
            Err(CacheError::Unavailable("down".into()))
        }
    }

    #[test]
    fn test_broken_backend_degrades_to_computation() {
        let cache: ResultCache<u64, BrokenStore> = ResultCache::with_store(BrokenStore);
        let (value, hit) = cache.get_or_compute(&key("k"), MINUTE, || Ok::<_, String>(9)).unwrap();
        assert_eq!((value, hit), (9, false));
        // Still no speed-up, still correct.
        let (value, hit) = cache.get_or_compute(&key("k"), MINUTE, || Ok::<_, String>(9)).unwrap();
        assert_eq!((value, hit), (9, false));
        assert_eq!(cache.stats().miss_count, 2);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_concurrent_misses_compute_once() {
        let cache: Arc<ResultCache<u64>> = Arc::new(ResultCache::in_memory());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    let (value, _) = cache
                        .get_or_compute(&key("shared"), MINUTE, || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(Duration::from_millis(30));
                            Ok::<_, String>(11)
                        })
                        .unwrap();
                    value
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 11);
        }
        // One winner computes; waiters reuse its entry.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
