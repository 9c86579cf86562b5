//! cached-image - cache-aside loading of remote images.
//!
//! An [`ImageCacheLoader`] answers synchronously from a shared HTTP response
//! cache when it can, and otherwise fetches, validates, decodes, and caches
//! the image in one asynchronous call.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Domain layer containing cache entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

pub use domain::{
    CacheEntry, CacheKey, DecodeError, FetchedResponse, HttpResponse, HttpTransportPort,
    ImageDecoderPort, LoadError, ResponseCachePort, ResponseMetadata, StoreError, TransportError,
};
pub use infrastructure::{ImageCacheLoader, ImageLoadedEvent, LoadResult};

/// Current version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = "cached-image";
