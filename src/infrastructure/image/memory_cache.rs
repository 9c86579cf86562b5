//! In-memory LRU response cache implementation.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::{CacheEntry, CacheKey};
use crate::domain::ports::ResponseCachePort;

/// Default maximum number of responses to keep in memory.
pub const DEFAULT_CACHE_SIZE: usize = 64;

/// In-memory LRU store for raw responses.
pub struct MemoryResponseCache {
    cache: Mutex<LruCache<CacheKey, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryResponseCache {
    /// Creates a new cache with the specified capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the default capacity.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    /// Peeks at an entry without promoting it in the LRU.
    #[must_use]
    pub fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.cache.lock().peek(key).cloned()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.cache.lock().clear();
        debug!("Cleared memory response cache");
    }
}

impl Default for MemoryResponseCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl std::fmt::Debug for MemoryResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryResponseCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached responses.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} responses, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

impl ResponseCachePort for MemoryResponseCache {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let mut cache = self.cache.lock();
        if let Some(entry) = cache.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache hit");
            Some(entry.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache miss");
            None
        }
    }

    fn put(&self, key: CacheKey, entry: CacheEntry) {
        debug!(key = %key, size = entry.len(), "Storing response in memory cache");
        self.cache.lock().put(key, entry);
    }

    fn remove(&self, key: &CacheKey) {
        if self.cache.lock().pop(key).is_some() {
            debug!(key = %key, "Removed response from memory cache");
        }
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.cache.lock().contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ResponseMetadata;
    use reqwest::Url;

    fn key(path: &str) -> CacheKey {
        CacheKey::for_url(&Url::parse(&format!("https://example.com/{path}")).unwrap())
    }

    fn entry(body: &'static [u8]) -> CacheEntry {
        CacheEntry::new(
            ResponseMetadata {
                url: "https://example.com/".to_string(),
                status: 200,
                headers: Vec::new(),
            },
            body,
        )
    }

    #[test]
    fn test_put_and_get() {
        let cache = MemoryResponseCache::new(10);
        cache.put(key("a.png"), entry(b"abc"));

        let retrieved = cache.get(&key("a.png")).unwrap();
        assert_eq!(&retrieved.body[..], b"abc");
    }

    #[test]
    fn test_miss() {
        let cache = MemoryResponseCache::new(10);
        assert!(cache.get(&key("missing.png")).is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let cache = MemoryResponseCache::new(10);
        cache.put(key("a.png"), entry(b"old"));
        cache.put(key("a.png"), entry(b"new"));

        assert_eq!(cache.len(), 1);
        assert_eq!(&cache.get(&key("a.png")).unwrap().body[..], b"new");
    }

    #[test]
    fn test_eviction() {
        let cache = MemoryResponseCache::new(2);
        cache.put(key("1"), entry(b"1"));
        cache.put(key("2"), entry(b"2"));
        cache.put(key("3"), entry(b"3"));

        // 1 is the least recently used
        assert!(cache.get(&key("1")).is_none());
        assert!(cache.get(&key("2")).is_some());
        assert!(cache.get(&key("3")).is_some());
    }

    #[test]
    fn test_stats() {
        let cache = MemoryResponseCache::new(10);
        cache.put(key("a"), entry(b"a"));

        let _ = cache.get(&key("a"));
        let _ = cache.get(&key("b"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_peek_does_not_promote() {
        let cache = MemoryResponseCache::new(2);
        cache.put(key("1"), entry(b"1"));
        cache.put(key("2"), entry(b"2"));

        let _ = cache.peek(&key("1"));
        cache.put(key("3"), entry(b"3"));

        assert!(cache.peek(&key("1")).is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = MemoryResponseCache::new(4);
        cache.put(key("1"), entry(b"1"));
        cache.put(key("2"), entry(b"2"));

        cache.remove(&key("1"));
        assert!(!cache.contains(&key("1")));

        cache.clear();
        assert!(cache.is_empty());
    }
}
