//! `image` crate backed decoder.

use std::sync::Arc;

use tracing::trace;

use crate::domain::errors::DecodeError;
use crate::domain::ports::ImageDecoderPort;

/// Decodes PNG, JPEG, and WebP bytes into a shared `DynamicImage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageCrateDecoder {
    /// Creates a new decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ImageDecoderPort for ImageCrateDecoder {
    type Image = Arc<image::DynamicImage>;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::new("empty body"));
        }
        let img = image::load_from_memory(bytes).map_err(|e| DecodeError::new(e.to_string()))?;
        trace!(
            width = img.width(),
            height = img.height(),
            "Decoded image"
        );
        Ok(Arc::new(img))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    /// Encodes a solid `width`x`height` RGB image as PNG.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(width, height);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::png_bytes;
    use super::*;

    #[test]
    fn test_decodes_png() {
        let img = ImageCrateDecoder::new().decode(&png_bytes(3, 2)).unwrap();
        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 2);
    }

    #[test]
    fn test_rejects_text() {
        let result = ImageCrateDecoder::new().decode(b"<html>not an image</html>");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(ImageCrateDecoder::new().decode(&[]).is_err());
    }
}
