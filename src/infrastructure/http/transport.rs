//! `reqwest` backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, trace};

use crate::domain::entities::{FetchedResponse, HttpResponse};
use crate::domain::errors::TransportError;
use crate::domain::ports::HttpTransportPort;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("cached-image/", env!("CARGO_PKG_VERSION"));

/// Options for building a [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout. `None` keeps the client default.
    pub timeout: Option<Duration>,
    /// User agent header.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Fetches `http(s)` URLs over the network and `file` URLs from disk.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given options.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_http(&self, url: &Url) -> Result<FetchedResponse, TransportError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();
        let body = response.bytes().await?;

        trace!(url = %url, status, size = body.len(), "HTTP response received");

        Ok(FetchedResponse::Http(HttpResponse {
            url: final_url,
            status,
            headers,
            body,
        }))
    }

    async fn fetch_file(url: &Url) -> Result<FetchedResponse, TransportError> {
        let path = url
            .to_file_path()
            .map_err(|()| TransportError::other(format!("not a local path: {url}")))?;
        let body = tokio::fs::read(&path).await?;
        Ok(FetchedResponse::NonHttp {
            url: url.to_string(),
            body: body.into(),
        })
    }
}

#[async_trait]
impl HttpTransportPort for ReqwestTransport {
    async fn fetch(&self, url: &Url) -> Result<FetchedResponse, TransportError> {
        debug!(url = %url, "Fetching");
        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "file" => Self::fetch_file(url).await,
            scheme => Err(TransportError::UnsupportedScheme {
                scheme: scheme.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use reqwest::Url;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Transport for talking to [`serve_once`], ignoring proxy settings.
    pub fn local_transport() -> super::ReqwestTransport {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        super::ReqwestTransport::with_client(client)
    }

    /// Serves one canned HTTP/1.1 response on a local port and returns its URL.
    pub async fn serve_once(status: &str, headers: &[(&str, &str)], body: &[u8]) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut response = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n",
            body.len()
        )
        .into_bytes();
        for (name, value) in headers {
            response.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
        }
        response.extend_from_slice(b"\r\n");
        response.extend_from_slice(body);

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(&response).await.unwrap();
            let _ = socket.shutdown().await;
        });

        Url::parse(&format!("http://{addr}/image.png")).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{local_transport, serve_once};
    use super::*;
    use crate::infrastructure::image::decoder::test_support::png_bytes;

    fn header<'a>(response: &'a HttpResponse, name: &str) -> Option<&'a str> {
        response
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[tokio::test]
    async fn test_http_ok_maps_status_headers_and_body() -> Result<(), Box<dyn std::error::Error>> {
        let png = png_bytes(2, 2);
        let url = serve_once(
            "200 OK",
            &[("Content-Type", "image/png"), ("ETag", "\"v1\"")],
            &png,
        )
        .await;

        let transport = local_transport();
        let FetchedResponse::Http(response) = transport.fetch(&url).await? else {
            panic!("HTTP URL classified as non-HTTP");
        };

        assert_eq!(response.status, 200);
        assert!(response.is_ok());
        assert_eq!(header(&response, "content-type"), Some("image/png"));
        assert_eq!(header(&response, "etag"), Some("\"v1\""));
        assert_eq!(&response.body[..], &png[..]);
        assert_eq!(response.url, url.as_str());
        Ok(())
    }

    #[tokio::test]
    async fn test_http_not_found_is_a_response() -> Result<(), Box<dyn std::error::Error>> {
        let url = serve_once("404 Not Found", &[("Content-Type", "text/plain")], b"missing").await;

        let transport = local_transport();
        let FetchedResponse::Http(response) = transport.fetch(&url).await? else {
            panic!("HTTP URL classified as non-HTTP");
        };

        assert_eq!(response.status, 404);
        assert!(!response.is_ok());
        assert_eq!(&response.body[..], b"missing");
        Ok(())
    }

    #[tokio::test]
    async fn test_redirect_reports_final_url() -> Result<(), Box<dyn std::error::Error>> {
        let target = serve_once("200 OK", &[("Content-Type", "image/png")], b"img").await;
        let origin = serve_once("302 Found", &[("Location", target.as_str())], b"").await;

        let transport = local_transport();
        let FetchedResponse::Http(response) = transport.fetch(&origin).await? else {
            panic!("HTTP URL classified as non-HTTP");
        };

        assert_eq!(response.status, 200);
        assert_eq!(response.url, target.as_str());
        Ok(())
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_error() -> Result<(), Box<dyn std::error::Error>> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);
        let url = Url::parse(&format!("http://{addr}/image.png"))?;

        let transport = local_transport();
        let err = transport.fetch(&url).await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
        Ok(())
    }

    #[test]
    fn test_transport_creation() {
        let config = TransportConfig {
            timeout: Some(Duration::from_secs(5)),
            ..TransportConfig::default()
        };
        assert!(ReqwestTransport::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_file_url_is_not_http() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"bytes")?;
        let url = Url::from_file_path(&path).map_err(|()| "bad path")?;

        let transport = local_transport();
        match transport.fetch(&url).await? {
            FetchedResponse::NonHttp { body, .. } => assert_eq!(&body[..], b"bytes"),
            FetchedResponse::Http(_) => panic!("file URL classified as HTTP"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_transport_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let url = Url::from_file_path(dir.path().join("missing.png")).map_err(|()| "bad path")?;

        let transport = local_transport();
        let err = transport.fetch(&url).await.unwrap_err();
        assert!(matches!(err, TransportError::Io(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_unsupported_scheme() -> Result<(), Box<dyn std::error::Error>> {
        let transport = local_transport();
        let url = Url::parse("ftp://example.com/a.png")?;

        let err = transport.fetch(&url).await.unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedScheme { ref scheme } if scheme == "ftp"));
        Ok(())
    }
}
