//! Raw responses as handed back by a transport.

use bytes::Bytes;

use super::cache_entry::{CacheEntry, CacheKey, ResponseMetadata};

/// An HTTP response with status, headers, and the full body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL of the response, after redirects.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Returns true if the status is exactly 200.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Converts the response into a cache entry answering `key`.
    #[must_use]
    pub fn into_cache_entry(self, key: &CacheKey) -> CacheEntry {
        CacheEntry::new(
            ResponseMetadata {
                url: key.as_str().to_owned(),
                status: self.status,
                headers: self.headers,
            },
            self.body,
        )
    }
}

/// Whatever the transport received for a request.
#[derive(Debug, Clone)]
pub enum FetchedResponse {
    /// A response that carries HTTP status and headers.
    Http(HttpResponse),
    /// A response that cannot be classified as HTTP (e.g. a `file://` read).
    NonHttp {
        /// URL that was read.
        url: String,
        /// Bytes that were read.
        body: Bytes,
    },
}
