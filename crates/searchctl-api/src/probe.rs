use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::client::{ApiError, HttpClient};
use crate::endpoint::Endpoint;

/// Outcome of one readiness probe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The service answered and is accepting its workload.
    Healthy,
    /// The service answered but is not ready to serve (still
    /// initializing, degraded, or an unexpected HTTP status).
    Unhealthy(String),
    /// No usable answer: timeout, refused connection, DNS or other
    /// transport failure.
    Unreachable(String),
}

/// Uniform probe interface for the poll loop.
///
/// Each implementation performs exactly one bounded check per call and
/// never retries internally; the retry policy lives in the backoff
/// scheduler so a probe stays a single, trivially mockable unit of work.
pub trait Probe: Send + Sync {
    fn check(&self, endpoint: &Endpoint) -> impl std::future::Future<Output = ProbeResult> + Send;
}

/// Shape of the `/ApplicationStatus` body. Both the container and the
/// config server serve a JSON document whose `status.code` is `"up"`
/// once the application is ready; everything else is tolerated.
#[derive(Debug, Clone, Default, Deserialize)]
struct ApplicationStatus {
    #[serde(default)]
    status: StatusBlock,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StatusBlock {
    #[serde(default)]
    code: String,
}

/// Probe that issues one HTTP GET against the endpoint's readiness path.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    http: HttpClient,
}

impl HttpProbe {
    /// Create a probe whose individual requests are bounded by
    /// `attempt_timeout`, independent of the overall session deadline.
    pub fn new(attempt_timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpClient::new(attempt_timeout)?,
        })
    }
}

impl Probe for HttpProbe {
    async fn check(&self, endpoint: &Endpoint) -> ProbeResult {
        debug!(service = %endpoint.kind, url = %endpoint.url, "probing");
        let resp = match self.http.get(&endpoint.url).await {
            Ok(resp) => resp,
            Err(e) => return ProbeResult::Unreachable(transport_cause(&e)),
        };

        let status = resp.status();
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return ProbeResult::Unhealthy("still initializing (503)".to_string());
        }
        if !status.is_success() {
            return ProbeResult::Unhealthy(format!("unexpected status {status}"));
        }

        // A 2xx body may still carry a status block reporting "down".
        match resp.json::<ApplicationStatus>().await {
            Ok(body) if body.status.code.is_empty() => ProbeResult::Healthy,
            Ok(body) if body.status.code.eq_ignore_ascii_case("up") => ProbeResult::Healthy,
            Ok(body) => ProbeResult::Unhealthy(format!("status code {:?}", body.status.code)),
            // Non-JSON or truncated bodies on a 2xx still count as up.
            Err(_) => ProbeResult::Healthy,
        }
    }
}

fn transport_cause(err: &ApiError) -> String {
    match err {
        ApiError::Request(e) if e.is_timeout() => "timed out waiting for response".to_string(),
        other => other.to_string(),
    }
}
