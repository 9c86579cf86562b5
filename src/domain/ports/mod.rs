mod image_decoder_port;
mod response_cache_port;
mod transport_port;

pub use image_decoder_port::ImageDecoderPort;
pub use response_cache_port::ResponseCachePort;
pub use transport_port::HttpTransportPort;

/// Test doubles for the ports.
#[cfg(test)]
pub mod mocks {
    pub use super::transport_port::MockHttpTransportPort;
}
