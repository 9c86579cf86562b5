//! Disk-based response cache for persistence across sessions.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use bytes::Bytes;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::domain::entities::{CacheEntry, CacheKey, ResponseMetadata};
use crate::domain::errors::StoreError;
use crate::domain::ports::ResponseCachePort;

/// Maximum disk cache size in bytes (200 MB default).
pub const DEFAULT_MAX_CACHE_SIZE: u64 = 200 * 1024 * 1024;

const BODY_EXT: &str = "img";
const META_EXT: &str = "meta";
const TMP_EXT: &str = "tmp";

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Bytes and entries currently stored, counted over `.img` files.
#[derive(Debug, Default, Clone, Copy)]
struct DiskUsage {
    size: u64,
    count: usize,
}

impl DiskUsage {
    fn add(&mut self, size: u64) {
        self.size = self.size.saturating_add(size);
        self.count += 1;
    }

    fn sub(&mut self, size: u64) {
        self.size = self.size.saturating_sub(size);
        self.count = self.count.saturating_sub(1);
    }
}

/// Disk-based store that persists response bodies and their metadata.
///
/// Each entry is two files named after the key digest: `<digest>.img` holds
/// the body and `<digest>.meta` holds the JSON-encoded metadata. Every file
/// change happens under the `usage` write lock, so the counters always match
/// the directory contents.
pub struct DiskResponseCache {
    cache_dir: PathBuf,
    max_size: u64,
    usage: RwLock<DiskUsage>,
}

impl DiskResponseCache {
    /// Opens (or creates) a disk cache in the specified directory.
    ///
    /// Temporary files left by interrupted writes are removed.
    ///
    /// # Errors
    /// Returns error if the cache directory cannot be created or read.
    pub fn new(cache_dir: PathBuf, max_size: u64) -> Result<Self, StoreError> {
        fs::create_dir_all(&cache_dir).map_err(|source| StoreError::CreateDir {
            path: cache_dir.display().to_string(),
            source,
        })?;

        let mut usage = DiskUsage::default();
        for entry in fs::read_dir(&cache_dir)?.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == TMP_EXT) {
                match fs::remove_file(&path) {
                    Ok(()) => trace!(path = %path.display(), "Removed stale temp file"),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to remove stale temp file");
                    }
                }
            } else if path.extension().is_some_and(|ext| ext == BODY_EXT)
                && let Ok(meta) = entry.metadata()
            {
                usage.add(meta.len());
            }
        }

        debug!(
            dir = %cache_dir.display(),
            entries = usage.count,
            size = usage.size,
            "Opened disk response cache"
        );

        let cache = Self {
            cache_dir,
            max_size,
            usage: RwLock::new(usage),
        };

        {
            let mut usage = cache.usage.write();
            cache.cleanup_if_needed(&mut usage);
        }

        Ok(cache)
    }

    /// Opens a cache in the default location (e.g. `~/.cache/cached-image/images/`).
    ///
    /// # Errors
    /// Returns error if the cache directory cannot be created.
    pub fn default_location() -> Result<Self, StoreError> {
        Self::new(default_cache_dir(), DEFAULT_MAX_CACHE_SIZE)
    }

    /// Returns the directory backing this cache.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    fn body_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(format!("{}.{BODY_EXT}", key.digest()))
    }

    fn meta_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(format!("{}.{META_EXT}", key.digest()))
    }

    fn read_entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        let _usage = self.usage.read();

        let raw = fs::read(self.meta_path(key)).ok()?;
        let response: ResponseMetadata = match serde_json::from_slice(&raw) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding unreadable cache metadata");
                return None;
            }
        };

        // Digest collisions and stale files from another key are misses.
        if response.url != key.as_str() {
            trace!(key = %key, stored = %response.url, "Disk cache key mismatch");
            return None;
        }

        let body_path = self.body_path(key);
        let body = fs::read(&body_path).ok()?;
        touch(&body_path);

        Some(CacheEntry::new(response, Bytes::from(body)))
    }

    /// Writes both files of an entry. On failure the entry is left either
    /// untouched or removed entirely, never half-replaced.
    fn write_entry(
        &self,
        key: &CacheKey,
        entry: &CacheEntry,
        usage: &mut DiskUsage,
    ) -> Result<(), StoreError> {
        let body_path = self.body_path(key);
        let meta_path = self.meta_path(key);
        let old_size = fs::metadata(&body_path).map(|m| m.len()).ok();

        let meta = serde_json::to_vec(&entry.response)?;
        write_atomic(&body_path, &entry.body)?;

        if let Err(e) = write_atomic(&meta_path, &meta) {
            let _ = fs::remove_file(&body_path);
            let _ = fs::remove_file(&meta_path);
            if let Some(old) = old_size {
                usage.sub(old);
            }
            return Err(e.into());
        }

        let new_size = entry.body.len() as u64;
        if let Some(old) = old_size {
            usage.sub(old);
        }
        usage.add(new_size);

        debug!(key = %key, path = %body_path.display(), size = new_size, "Stored response in disk cache");
        Ok(())
    }

    /// Clears the entire disk cache.
    ///
    /// # Errors
    /// Returns error if the cache directory cannot be read.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut usage = self.usage.write();
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if is_cache_file(&path) && fs::remove_file(&path).is_err() {
                warn!(path = %path.display(), "Failed to remove cache file");
            }
        }
        *usage = DiskUsage::default();
        debug!("Cleared disk cache");
        Ok(())
    }

    /// Returns the current size of stored bodies in bytes.
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.usage.read().size
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.usage.read().count
    }

    /// Returns true if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes least recently used entries if over the size limit.
    fn cleanup_if_needed(&self, usage: &mut DiskUsage) {
        let current_size = usage.size;
        if current_size <= self.max_size {
            return;
        }

        debug!(
            current_size = current_size,
            max_size = self.max_size,
            "Disk cache over limit, cleaning up"
        );

        let Ok(entries) = fs::read_dir(&self.cache_dir) else {
            return;
        };

        let mut files: Vec<(PathBuf, SystemTime, u64)> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_none_or(|ext| ext != BODY_EXT) {
                    return None;
                }
                let meta = entry.metadata().ok()?;
                let used = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                Some((path, used, meta.len()))
            })
            .collect();

        files.sort_by_key(|(_, time, _)| *time);

        let mut freed_size = 0u64;
        let mut freed_count = 0usize;
        let target = current_size - self.max_size + (self.max_size / 10);

        for (path, _, size) in files {
            if freed_size >= target {
                break;
            }

            if let Err(e) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "Failed to remove old cache file");
                continue;
            }
            let _ = fs::remove_file(path.with_extension(META_EXT));
            trace!(path = %path.display(), "Removed old cache file");
            usage.sub(size);
            freed_size += size;
            freed_count += 1;
        }

        debug!(
            freed_size = freed_size,
            freed_count = freed_count,
            "Disk cache cleanup complete"
        );
    }
}

impl std::fmt::Debug for DiskResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskResponseCache")
            .field("cache_dir", &self.cache_dir)
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

impl ResponseCachePort for DiskResponseCache {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.read_entry(key);
        if entry.is_some() {
            trace!(key = %key, "Disk cache hit");
        } else {
            trace!(key = %key, "Disk cache miss");
        }
        entry
    }

    fn put(&self, key: CacheKey, entry: CacheEntry) {
        let mut usage = self.usage.write();
        if let Err(e) = self.write_entry(&key, &entry, &mut usage) {
            warn!(key = %key, error = %e, "Failed to write disk cache entry");
            return;
        }
        self.cleanup_if_needed(&mut usage);
    }

    fn remove(&self, key: &CacheKey) {
        let mut usage = self.usage.write();
        let path = self.body_path(key);
        let size = fs::metadata(&path).map(|m| m.len()).ok();
        let _ = fs::remove_file(self.meta_path(key));
        match fs::remove_file(&path) {
            Ok(()) => {
                if let Some(s) = size {
                    usage.sub(s);
                }
                debug!(key = %key, "Removed response from disk cache");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(key = %key, error = %e, "Failed to remove from disk cache"),
        }
    }

    fn contains(&self, key: &CacheKey) -> bool {
        let _usage = self.usage.read();
        self.meta_path(key).exists() && self.body_path(key).exists()
    }
}

fn is_cache_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == BODY_EXT || ext == META_EXT || ext == TMP_EXT)
}

/// Writes through a temporary file so readers never observe a partial file.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = path.with_extension(format!("{}.{seq}.{TMP_EXT}", std::process::id()));
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

/// Marks a file as recently used for size-based cleanup.
fn touch(path: &Path) {
    if let Ok(file) = fs::File::options().write(true).open(path) {
        let _ = file.set_modified(SystemTime::now());
    }
}

/// Returns the default cache directory path.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "linuxmobile", "cached-image").map_or_else(
        || {
            std::env::temp_dir()
                .join("cached-image")
                .join("cache")
                .join("images")
        },
        |dirs| dirs.cache_dir().join("images"),
    )
}
