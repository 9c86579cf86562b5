//! Port definition for the network transport.

use async_trait::async_trait;
use reqwest::Url;

use crate::domain::entities::FetchedResponse;
use crate::domain::errors::TransportError;

/// Performs a single GET request and returns the raw response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransportPort: Send + Sync {
    /// Fetches `url`. Only connection-level failures are errors; any
    /// status code is returned as a response.
    async fn fetch(&self, url: &Url) -> Result<FetchedResponse, TransportError>;
}
