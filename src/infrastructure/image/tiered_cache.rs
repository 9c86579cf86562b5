//! Two-tier response cache: memory in front of disk.

use std::sync::Arc;

use tracing::trace;

use crate::domain::entities::{CacheEntry, CacheKey};
use crate::domain::ports::ResponseCachePort;

use super::disk_cache::DiskResponseCache;
use super::memory_cache::MemoryResponseCache;

/// Serves reads from memory, falls back to disk, and writes through to both.
#[derive(Debug)]
pub struct TieredResponseCache {
    memory: Arc<MemoryResponseCache>,
    disk: Arc<DiskResponseCache>,
}

impl TieredResponseCache {
    /// Combines a memory and a disk store.
    #[must_use]
    pub const fn new(memory: Arc<MemoryResponseCache>, disk: Arc<DiskResponseCache>) -> Self {
        Self { memory, disk }
    }

    /// Returns the memory tier.
    #[must_use]
    pub fn memory(&self) -> &MemoryResponseCache {
        &self.memory
    }

    /// Returns the disk tier.
    #[must_use]
    pub fn disk(&self) -> &DiskResponseCache {
        &self.disk
    }
}

impl ResponseCachePort for TieredResponseCache {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        if let Some(entry) = self.memory.get(key) {
            return Some(entry);
        }

        let entry = self.disk.get(key)?;
        trace!(key = %key, "Promoting disk entry to memory");
        self.memory.put(key.clone(), entry.clone());
        Some(entry)
    }

    fn put(&self, key: CacheKey, entry: CacheEntry) {
        self.disk.put(key.clone(), entry.clone());
        self.memory.put(key, entry);
    }

    fn remove(&self, key: &CacheKey) {
        self.memory.remove(key);
        self.disk.remove(key);
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.memory.contains(key) || self.disk.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ResponseMetadata;
    use reqwest::Url;
    use tempfile::TempDir;

    fn setup() -> (TieredResponseCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let disk = DiskResponseCache::new(temp_dir.path().to_path_buf(), 1024 * 1024).unwrap();
        let tiered =
            TieredResponseCache::new(Arc::new(MemoryResponseCache::new(4)), Arc::new(disk));
        (tiered, temp_dir)
    }

    fn key_and_entry(path: &str, body: &'static [u8]) -> (CacheKey, CacheEntry) {
        let key = CacheKey::for_url(&Url::parse(&format!("https://example.com/{path}")).unwrap());
        let entry = CacheEntry::new(
            ResponseMetadata {
                url: key.as_str().to_string(),
                status: 200,
                headers: Vec::new(),
            },
            body,
        );
        (key, entry)
    }

    #[test]
    fn test_put_writes_both_tiers() {
        let (cache, _temp) = setup();
        let (key, entry) = key_and_entry("a.png", b"abc");

        cache.put(key.clone(), entry);

        assert!(cache.memory().contains(&key));
        assert!(cache.disk().contains(&key));
    }

    #[test]
    fn test_disk_hit_is_promoted() {
        let (cache, _temp) = setup();
        let (key, entry) = key_and_entry("a.png", b"abc");

        cache.disk().put(key.clone(), entry);
        assert!(!cache.memory().contains(&key));

        let hit = cache.get(&key).unwrap();
        assert_eq!(&hit.body[..], b"abc");
        assert!(cache.memory().contains(&key));
    }

    #[test]
    fn test_remove_clears_both_tiers() {
        let (cache, _temp) = setup();
        let (key, entry) = key_and_entry("a.png", b"abc");

        cache.put(key.clone(), entry);
        cache.remove(&key);

        assert!(!cache.contains(&key));
        assert!(cache.get(&key).is_none());
    }
}
