//! Infrastructure layer with adapters for the network, caches, and configuration.

/// Application configuration.
pub mod config;
/// HTTP transport.
pub mod http;
/// Image handling (loading, response caching, decoding).
pub mod image;

pub use config::{AppConfig, CacheConfig, CliArgs, Command, ConfigError, ConfigLoader, LogLevel};
pub use http::{ReqwestTransport, TransportConfig};
pub use image::{
    CacheStats, DiskResponseCache, ImageCacheLoader, ImageCrateDecoder, ImageLoadedEvent,
    LoadResult, MemoryResponseCache, TieredResponseCache,
};
