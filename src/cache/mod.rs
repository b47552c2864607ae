//! Document caching.
//!
//! - [`LruCache`]: single-owner bounded LRU store with O(1) `has`/`get`/`put`.
//! - [`DocumentCache`]: the shared form used by [`DataSource`](crate::DataSource):
//!   an [`LruCache`] of response bodies behind one coarse mutex, since a
//!   cache hit mutates recency state.
//!
//! The cache lives in memory only and is dropped with its owner. Failures
//! are reported as [`CacheError`], which callers treat as soft: log, then
//! carry on as if the cache were empty.

pub mod lru;

use std::sync::{Mutex, MutexGuard};

pub use lru::LruCache;

/// Capacity used when none is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 120;

/// Cache-internal failures. Never surfaced through the fetch API.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("no cache entry for key {0:?}")]
    NotFound(String),

    /// A thread panicked while holding the cache lock; contents may be torn.
    #[error("cache lock poisoned")]
    Poisoned,
}

/// Thread-safe LRU cache of response bodies keyed by hash token.
pub struct DocumentCache {
    inner: Mutex<LruCache<String>>,
}

impl DocumentCache {
    /// Create an empty cache with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LruCache<String>>, CacheError> {
        self.inner.lock().map_err(|_| CacheError::Poisoned)
    }

    /// Whether `key` is cached.
    pub fn has(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.lock()?.has(key))
    }

    /// Fetch a copy of the document stored under `key`, promoting it.
    pub fn get(&self, key: &str) -> Result<String, CacheError> {
        self.lock()?.get(key).cloned()
    }

    /// Store `document` under `key`, evicting the least-recently-used entry
    /// when full. Returns the evicted key, if any.
    pub fn put(&self, key: &str, document: String) -> Result<Option<String>, CacheError> {
        Ok(self.lock()?.put(key, document))
    }

    /// Number of cached documents (0 if the lock is poisoned).
    pub fn len(&self) -> usize {
        self.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.lock().map(|c| c.capacity()).unwrap_or(0)
    }

    /// Evict every entry.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.lock()?.clear();
        Ok(())
    }

    /// Poison the lock by panicking while holding it.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        std::thread::scope(|s| {
            let _ = s
                .spawn(|| {
                    let _guard = self.inner.lock();
                    panic!("poison the cache lock");
                })
                .join();
        });
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
