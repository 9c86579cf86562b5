//! Cache addressing and stored response types.

use bytes::Bytes;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Identifier for a cached response, derived from the request URL.
///
/// Two keys are equal iff their URL strings are equal. No normalization
/// happens beyond what URL parsing already performs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for a GET request to `url`.
    #[must_use]
    pub fn for_url(url: &Url) -> Self {
        Self(url.as_str().to_owned())
    }

    /// Returns the URL string this key addresses.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a stable, filesystem-safe digest of the key.
    #[must_use]
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16])
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Url> for CacheKey {
    fn from(url: &Url) -> Self {
        Self::for_url(url)
    }
}

/// Response metadata kept alongside cached bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Request URL this response answers.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

impl ResponseMetadata {
    /// Returns the first header value matching `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// A stored response: metadata plus the raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Response metadata.
    pub response: ResponseMetadata,
    /// Raw response body.
    pub body: Bytes,
}

impl CacheEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(response: ResponseMetadata, body: impl Into<Bytes>) -> Self {
        Self {
            response,
            body: body.into(),
        }
    }

    /// Size of the stored body in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true if the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
