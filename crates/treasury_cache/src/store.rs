//! Abstract cache backend and the in-process implementation.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use crate::error::CacheError;
use crate::fingerprint::Fingerprint;

/// A stored result with its bookkeeping.
///
/// Owned exclusively by the cache layer; evicted by TTL expiry or explicit
/// invalidation, never mutated from outside.
#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    /// The memoised result.
    pub value: V,
    /// When the entry was stored.
    pub created_at: Instant,
    /// When the entry was last served.
    pub last_access: Instant,
    /// How many lookups the entry has served.
    pub hits: u64,
}

impl<V> CacheEntry<V> {
    /// Creates a fresh entry stored at `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            last_access: now,
            hits: 0,
        }
    }

    /// Entry age relative to `now`.
    pub fn age(&self, now: Instant) -> std::time::Duration {
        now.duration_since(self.created_at)
    }
}

/// Abstract key-value backend behind the cache layer.
///
/// Whether the concrete store is in-process memory or a remote service is
/// an implementation choice behind this interface; TTL semantics and
/// statistics are identical either way because both live in the layer, not
/// the store. Every method is fallible: a backend that cannot serve a
/// request reports a [`CacheError`] and the layer degrades to direct
/// computation.
pub trait CacheStore<V>: Send + Sync {
    /// Stores an entry under a key, replacing any previous entry.
    fn put(&self, key: Fingerprint, entry: CacheEntry<V>) -> Result<(), CacheError>;

    /// Retrieves the entry under a key, if any.
    fn get(&self, key: &Fingerprint) -> Result<Option<CacheEntry<V>>, CacheError>;

    /// Records a served lookup on an entry.
    fn touch(&self, key: &Fingerprint, now: Instant) -> Result<(), CacheError>;

    /// Removes the entry under a key. Absent keys are not an error.
    fn delete(&self, key: &Fingerprint) -> Result<(), CacheError>;

    /// Removes every entry.
    fn clear(&self) -> Result<(), CacheError>;

    /// Number of entries currently stored.
    fn len(&self) -> Result<usize, CacheError>;
}

/// In-process store: a hash map behind a read-write lock.
///
/// Readers never observe a partially written entry; `put` replaces the
/// slot atomically under the write lock. A poisoned lock is reported as a
/// backend failure, which the layer turns into direct computation.
#[derive(Debug, Default)]
pub struct MemoryStore<V> {
    entries: RwLock<HashMap<Fingerprint, CacheEntry<V>>>,
}

impl<V> MemoryStore<V> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

fn poisoned(op: &str) -> CacheError {
    CacheError::Backend(format!("store lock poisoned during {}", op))
}

impl<V: Clone + Send + Sync> CacheStore<V> for MemoryStore<V> {
    fn put(&self, key: Fingerprint, entry: CacheEntry<V>) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| poisoned("put"))?;
        entries.insert(key, entry);
        Ok(())
    }

    fn get(&self, key: &Fingerprint) -> Result<Option<CacheEntry<V>>, CacheError> {
        let entries = self.entries.read().map_err(|_| poisoned("get"))?;
        Ok(entries.get(key).cloned())
    }

    fn touch(&self, key: &Fingerprint, now: Instant) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| poisoned("touch"))?;
        if let Some(entry) = entries.get_mut(key) {
            entry.last_access = now;
            entry.hits += 1;
        }
        Ok(())
    }

    fn delete(&self, key: &Fingerprint) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| poisoned("delete"))?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| poisoned("clear"))?;
        entries.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, CacheError> {
        let entries = self.entries.read().map_err(|_| poisoned("len"))?;
        Ok(entries.len())
    }
}
