//! Port definition for image decoding.

use crate::domain::errors::DecodeError;

/// Turns raw bytes into an in-memory image.
///
/// Decoding is synchronous and must not touch shared state.
pub trait ImageDecoderPort: Send + Sync {
    /// Decoded image handle handed back to callers.
    type Image: Clone + Send + Sync + 'static;

    /// Decodes `bytes` into an image.
    ///
    /// # Errors
    /// Returns `DecodeError` if the bytes are not a supported image.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, DecodeError>;
}
