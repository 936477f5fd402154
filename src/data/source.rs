//! Network source for the quiz feed
//!
//! [`QuizSource`] is the seam between the store and the network. The
//! production implementation is [`HttpSource`], a thin wrapper over reqwest
//! that returns the raw response body so it can be cached verbatim.

use std::future::Future;

use reqwest::{Client, Url};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when fetching the quiz feed
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The host could not be reached at all
    #[error("No network connection: {0}")]
    NotConnected(String),

    /// Any other transport failure (timeout, TLS, interrupted body, ...)
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
}

impl FetchError {
    /// Whether this error means the device is offline
    pub fn is_not_connected(&self) -> bool {
        matches!(self, FetchError::NotConnected(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            FetchError::NotConnected(err.to_string())
        } else {
            FetchError::RequestFailed(err.to_string())
        }
    }
}

/// Something that can fetch the raw bytes of the quiz feed
pub trait QuizSource: Send + Sync + 'static {
    /// Fetches the body at `url`
    fn fetch(&self, url: Url) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Fetches the quiz feed over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSource {
    /// Create a new HttpSource with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a new HttpSource with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl QuizSource for HttpSource {
    async fn fetch(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        debug!(%url, "fetching quiz feed");
        let response = self.client.get(url).send().await?;

        // Error statuses still carry a body; the decoder decides what to do with it
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "quiz feed returned a non-success status");
        }

        let bytes = response.bytes().await?;
        debug!(len = bytes.len(), "quiz feed received");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_connected_is_classified() {
        let err = FetchError::NotConnected("connection refused".to_string());
        assert!(err.is_not_connected());
        assert!(err.to_string().contains("No network connection"));
    }

    #[test]
    fn test_request_failed_is_not_offline() {
        let err = FetchError::RequestFailed("timed out".to_string());
        assert!(!err.is_not_connected());
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_not_connected() {
        // Bind then release a port so nothing is listening on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let source = HttpSource::with_client(reqwest::Client::new());
        let url = Url::parse(&format!("http://127.0.0.1:{}/questions.json", port)).unwrap();

        let result = source.fetch(url).await;

        let err = result.expect_err("closed port should fail");
        assert!(err.is_not_connected(), "expected a connect error, got {err:?}");
    }
}
