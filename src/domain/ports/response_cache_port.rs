//! Port definition for the shared HTTP response cache.

use crate::domain::entities::{CacheEntry, CacheKey};

/// Shared response store consulted and populated by the image loader.
///
/// Implementations must be safe for concurrent use. Storage layout and
/// eviction are entirely up to the implementation.
pub trait ResponseCachePort: Send + Sync {
    /// Returns the entry stored under `key`, if any.
    fn get(&self, key: &CacheKey) -> Option<CacheEntry>;

    /// Stores `entry` under `key`, replacing any previous entry.
    fn put(&self, key: CacheKey, entry: CacheEntry);

    /// Removes the entry stored under `key`.
    fn remove(&self, key: &CacheKey);

    /// Returns true if an entry is stored under `key`.
    fn contains(&self, key: &CacheKey) -> bool {
        self.get(key).is_some()
    }
}
