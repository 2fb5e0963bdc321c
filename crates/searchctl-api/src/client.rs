use std::time::Duration;

use reqwest::Response;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Shared HTTP client for readiness probes.
///
/// Wraps [`reqwest::Client`] with a per-request timeout so a single
/// probe can never outlive its attempt budget, whatever the overall
/// session deadline is.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new client whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { inner, timeout })
    }

    /// GET `url` and return the raw response, whatever its status.
    ///
    /// Errors here are transport-level only (timeout, refused connection,
    /// DNS); HTTP error statuses come back as `Ok` responses for the
    /// caller to classify.
    pub async fn get(&self, url: &Url) -> Result<Response, ApiError> {
        Ok(self.inner.get(url.clone()).send().await?)
    }

    /// The per-request timeout this client applies.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("timeout", &self.timeout)
            .finish()
    }
}
