//! Client-side generation request pipeline.

use crate::{
    ClientError, ClientErrorKind, GenerateTransport, HttpTransport, RetryPolicy, TransportResponse,
    retry_with_backoff,
};
use derive_getters::Getters;
use moodcaster_core::{Category, GenerationRequest, Mood, normalize_cast, truncate_chars};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8787";

/// Client deadline used when none is configured.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(20);

/// Longest diagnostic excerpt kept from a non-JSON body.
const MAX_DIAGNOSTIC_CHARS: usize = 200;

/// Configuration for the request orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct OrchestratorConfig {
    /// Endpoint base URL
    #[builder(default = "DEFAULT_ENDPOINT.to_string()")]
    endpoint: String,
    /// Deadline for one attempt
    #[builder(default = "DEFAULT_CLIENT_TIMEOUT")]
    timeout: Duration,
    /// Retry policy for transport failures
    #[builder(default)]
    retry: RetryPolicy,
}

impl OrchestratorConfig {
    /// Creates a builder with every field at its default.
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_CLIENT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Issues generation requests and interprets the endpoint's answer.
#[derive(Debug, Clone)]
pub struct Orchestrator<T = HttpTransport> {
    transport: T,
    policy: RetryPolicy,
}

impl Orchestrator<HttpTransport> {
    /// Creates an orchestrator talking HTTP to the configured endpoint.
    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self::new(
            HttpTransport::new(config.endpoint().clone(), *config.timeout()),
            *config.retry(),
        )
    }
}

impl<T: GenerateTransport> Orchestrator<T> {
    /// Creates an orchestrator over any transport.
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Requests a draft for a mood and category.
    ///
    /// The returned text is trimmed and at most 280 characters long.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` or `Network` once retries are exhausted, `Remote` when
    /// the endpoint reports an error, and `InvalidResponse` for unusable bodies.
    pub async fn generate(
        &self,
        mood: Mood,
        category: Category,
        diverse: bool,
    ) -> Result<String, ClientError> {
        self.generate_request(&GenerationRequest::new(mood, category, diverse))
            .await
    }

    /// Sends a prepared request.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::generate`].
    #[instrument(
        skip(self, request),
        fields(mood = %request.mood, category = %request.category, diverse = request.diverse)
    )]
    pub async fn generate_request(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, ClientError> {
        let response =
            retry_with_backoff(&self.policy, || self.transport.send(request)).await?;
        interpret(response)
    }
}

/// Turns an endpoint response into draft text or an error.
///
/// # Errors
///
/// Returns `Remote` for error statuses or an `error` field, and
/// `InvalidResponse` for non-JSON or text-less success bodies.
pub fn interpret(response: TransportResponse) -> Result<String, ClientError> {
    if !response.is_json() {
        let excerpt = truncate_chars(response.body.trim(), MAX_DIAGNOSTIC_CHARS);
        let message = if excerpt.is_empty() {
            "Non-JSON error response".to_string()
        } else {
            excerpt.to_string()
        };
        debug!(status = response.status, message = %message, "Non-JSON response");
        return Err(if response.is_success() {
            ClientError::new(ClientErrorKind::InvalidResponse(message))
        } else {
            ClientError::new(ClientErrorKind::Remote {
                status: response.status,
                message,
            })
        });
    }

    let data: Option<Value> = serde_json::from_str(&response.body).ok();
    let error_message = data
        .as_ref()
        .and_then(|d| d.get("error"))
        .filter(|e| !e.is_null())
        .map(|e| match e.as_str() {
            Some(text) => text.to_string(),
            None => e.to_string(),
        })
        .filter(|message| !message.is_empty());

    if !response.is_success() || error_message.is_some() {
        return Err(ClientError::new(ClientErrorKind::Remote {
            status: response.status,
            message: error_message.unwrap_or(response.reason),
        }));
    }

    let Some(data) = data else {
        return Err(ClientError::new(ClientErrorKind::InvalidResponse(
            "Malformed JSON body".to_string(),
        )));
    };

    let text = normalize_cast(data.get("text").and_then(Value::as_str).unwrap_or_default());
    if text.is_empty() {
        return Err(ClientError::new(ClientErrorKind::InvalidResponse(
            "Response carried no text".to_string(),
        )));
    }

    let fallback = data.get("fallback").and_then(Value::as_bool).unwrap_or(false);
    info!(chars = text.chars().count(), fallback, "Draft received");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: Option<&str>, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            reason: if status == 200 { "OK" } else { "Internal Server Error" }.to_string(),
            content_type: content_type.map(str::to_string),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_success_is_trimmed_and_capped() {
        let body =
            serde_json::json!({"text": format!("  {}  ", "x".repeat(400)), "fallback": false});
        let text = interpret(response(200, Some("application/json"), &body.to_string())).unwrap();
        assert_eq!(text.chars().count(), 280);
        assert!(text.starts_with('x'));
    }

    #[test]
    fn test_error_field_wins_even_on_200() {
        let err =
            interpret(response(200, Some("application/json"), r#"{"error":"nope"}"#)).unwrap_err();
        assert_eq!(
            err.kind(),
            &ClientErrorKind::Remote {
                status: 200,
                message: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_status_reason_without_message() {
        let err = interpret(response(500, Some("application/json"), "{}")).unwrap_err();
        assert_eq!(
            err.kind(),
            &ClientErrorKind::Remote {
                status: 500,
                message: "Internal Server Error".to_string()
            }
        );
    }

    #[test]
    fn test_non_json_body_is_truncated() {
        let html = format!("<html>{}</html>", "y".repeat(500));
        let err = interpret(response(502, Some("text/html"), &html)).unwrap_err();
        match err.kind() {
            ClientErrorKind::Remote { status, message } => {
                assert_eq!(*status, 502);
                assert_eq!(message.chars().count(), 200);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_non_json_body() {
        let err = interpret(response(502, None, "")).unwrap_err();
        assert_eq!(
            err.kind(),
            &ClientErrorKind::Remote {
                status: 502,
                message: "Non-JSON error response".to_string()
            }
        );
    }

    #[test]
    fn test_missing_text_is_invalid() {
        let err =
            interpret(response(200, Some("application/json"), r#"{"text":"   "}"#)).unwrap_err();
        assert!(matches!(err.kind(), ClientErrorKind::InvalidResponse(_)));

        let err = interpret(response(200, Some("application/json"), "not json")).unwrap_err();
        assert!(matches!(err.kind(), ClientErrorKind::InvalidResponse(_)));
    }
}
