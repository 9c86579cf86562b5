//! Cache-aside image loader.
//!
//! Reads go to the shared response cache first. Misses are fetched once from
//! the network, validated, decoded, and written back to the cache.

use std::sync::Arc;

use reqwest::Url;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::domain::entities::{CacheKey, FetchedResponse};
use crate::domain::errors::LoadError;
use crate::domain::ports::{HttpTransportPort, ImageDecoderPort, ResponseCachePort};

use super::decoder::ImageCrateDecoder;

/// Outcome of a single [`ImageCacheLoader::load`] call.
pub type LoadResult<I> = Result<I, LoadError>;

/// Message sent when a background load finishes.
#[derive(Debug)]
pub struct ImageLoadedEvent<I> {
    /// URL that was loaded.
    pub url: Url,
    /// The decoded image, or why loading failed.
    pub result: LoadResult<I>,
}

/// Loads remote images through a shared response cache.
///
/// The loader holds no mutable state of its own; concurrent calls only
/// share the injected cache store.
pub struct ImageCacheLoader<D: ImageDecoderPort = ImageCrateDecoder> {
    cache: Arc<dyn ResponseCachePort>,
    transport: Arc<dyn HttpTransportPort>,
    decoder: D,
}

impl<D: ImageDecoderPort> std::fmt::Debug for ImageCacheLoader<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCacheLoader").finish_non_exhaustive()
    }
}

impl ImageCacheLoader<ImageCrateDecoder> {
    /// Creates a loader that decodes with the `image` crate.
    #[must_use]
    pub fn with_default_decoder(
        cache: Arc<dyn ResponseCachePort>,
        transport: Arc<dyn HttpTransportPort>,
    ) -> Self {
        Self::new(cache, transport, ImageCrateDecoder::new())
    }
}

impl<D: ImageDecoderPort> ImageCacheLoader<D> {
    /// Creates a loader over the given cache, transport, and decoder.
    #[must_use]
    pub fn new(
        cache: Arc<dyn ResponseCachePort>,
        transport: Arc<dyn HttpTransportPort>,
        decoder: D,
    ) -> Self {
        Self {
            cache,
            transport,
            decoder,
        }
    }

    /// Returns the shared cache store.
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn ResponseCachePort> {
        &self.cache
    }

    /// Returns the cached image for `url`, if one is stored and decodes.
    ///
    /// A cached body that fails to decode is reported as a miss.
    pub fn lookup_cached(&self, url: &Url) -> Option<D::Image> {
        let key = CacheKey::for_url(url);
        let entry = self.cache.get(&key)?;

        match self.decoder.decode(&entry.body) {
            Ok(image) => {
                trace!(url = %url, "Cached image hit");
                Some(image)
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Cached body did not decode, treating as miss");
                None
            }
        }
    }

    /// Fetches `url`, validates and decodes the response, and caches it.
    ///
    /// Exactly one network attempt is made. The cache is written only on
    /// success, and always before this returns.
    ///
    /// # Errors
    /// Returns `LoadError` if the transport fails, the response is not HTTP,
    /// the status is not 200, or the body is not a decodable image.
    pub async fn load(&self, url: &Url) -> LoadResult<D::Image> {
        debug!(url = %url, "Downloading image from network");

        let response = self.transport.fetch(url).await.map_err(|e| {
            warn!(url = %url, timeout = e.is_timeout(), error = %e, "Image request failed");
            LoadError::Transport(e)
        })?;

        let response = match response {
            FetchedResponse::Http(response) => response,
            FetchedResponse::NonHttp { url: source, body } => {
                debug!(url = %url, source = %source, size = body.len(), "Response is not HTTP");
                return Err(LoadError::InvalidResponse);
            }
        };

        if response.url != url.as_str() {
            trace!(url = %url, final_url = %response.url, "Followed redirect");
        }

        if !response.is_ok() {
            debug!(url = %url, status = response.status, "Unexpected status");
            return Err(LoadError::invalid_status(response.status));
        }

        let image = self.decoder.decode(&response.body).map_err(|e| {
            debug!(url = %url, error = %e, "Response body is not an image");
            LoadError::InvalidData
        })?;

        let key = CacheKey::for_url(url);
        self.cache.put(key.clone(), response.into_cache_entry(&key));

        debug!(url = %url, "Image loaded successfully");
        Ok(image)
    }
}

impl<D> ImageCacheLoader<D>
where
    D: ImageDecoderPort + 'static,
{
    /// Starts loading `url` on the runtime and reports the outcome on `tx`.
    ///
    /// Aborting the returned handle abandons the fetch. A cache write that
    /// already happened is kept.
    pub fn spawn_load(
        self: &Arc<Self>,
        url: Url,
        tx: mpsc::UnboundedSender<ImageLoadedEvent<D::Image>>,
    ) -> JoinHandle<()> {
        let loader = Arc::clone(self);
        tokio::spawn(async move {
            let result = loader.load(&url).await;
            if tx.send(ImageLoadedEvent { url, result }).is_err() {
                debug!("Image event receiver dropped");
            }
        })
    }
}
