//! HTTP transport between the orchestrator and the generation endpoint.

use crate::{ClientError, ClientErrorKind};
use async_trait::async_trait;
use moodcaster_core::GenerationRequest;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Raw response from the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase for the status
    pub reason: String,
    /// Declared content type, if any
    pub content_type: Option<String>,
    /// Response body as text
    pub body: String,
}

impl TransportResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if the declared content type is JSON.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

/// Sends generation requests to an endpoint.
///
/// Implementations report transport-level failures as `Timeout` or `Network`
/// and return every HTTP response, successful or not, as a
/// [`TransportResponse`].
#[async_trait]
pub trait GenerateTransport: Send + Sync {
    /// Sends one generation request.
    async fn send(&self, request: &GenerationRequest) -> Result<TransportResponse, ClientError>;
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    /// Endpoint is up
    pub ok: bool,
    /// Configured upstream model
    #[serde(default)]
    pub model: Option<String>,
}

/// reqwest-backed transport with a per-request deadline.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport for an endpoint base URL such as `http://127.0.0.1:8787`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        debug!(
            endpoint = %endpoint,
            timeout_ms = timeout.as_millis() as u64,
            "Created HTTP transport"
        );
        Self {
            client: Client::new(),
            endpoint,
            timeout,
        }
    }

    /// Endpoint base URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Queries `GET /api/health`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unreachable, answers with an error
    /// status or sends an unexpected body.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/health", self.endpoint))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(ClientErrorKind::Remote {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown status").to_string(),
            }));
        }

        response.json::<HealthStatus>().await.map_err(|e| {
            ClientError::new(ClientErrorKind::InvalidResponse(format!(
                "Failed to parse health response: {}",
                e
            )))
        })
    }

    #[track_caller]
    fn map_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            warn!(endpoint = %self.endpoint, "Request timed out");
            ClientError::new(ClientErrorKind::Timeout(self.timeout.as_millis() as u64))
        } else {
            warn!(endpoint = %self.endpoint, error = %err, "Request failed");
            ClientError::new(ClientErrorKind::Network(err.to_string()))
        }
    }
}

#[async_trait]
impl GenerateTransport for HttpTransport {
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn send(&self, request: &GenerationRequest) -> Result<TransportResponse, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(|e| self.map_error(e))?;

        debug!(status = status.as_u16(), bytes = body.len(), "Received response");
        Ok(TransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown status").to_string(),
            content_type,
            body,
        })
    }
}
