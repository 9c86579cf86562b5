//! Domain layer with cache entities, load errors, and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{CacheEntry, CacheKey, FetchedResponse, HttpResponse, ResponseMetadata};
pub use errors::{DecodeError, LoadError, StoreError, TransportError};
pub use ports::{HttpTransportPort, ImageDecoderPort, ResponseCachePort};
