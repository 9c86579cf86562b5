//! Image handling infrastructure.
//!
//! This module provides:
//! - The cache-aside image loader
//! - Memory, disk, and tiered response stores
//! - An `image` crate decoder

pub mod decoder;
pub mod disk_cache;
pub mod loader;
pub mod memory_cache;
pub mod tiered_cache;

pub use decoder::ImageCrateDecoder;
pub use disk_cache::DiskResponseCache;
pub use loader::{ImageCacheLoader, ImageLoadedEvent, LoadResult};
pub use memory_cache::{CacheStats, MemoryResponseCache};
pub use tiered_cache::TieredResponseCache;
