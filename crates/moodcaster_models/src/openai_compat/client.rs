//! Generic client for OpenAI-compatible APIs.

use crate::openai_compat::{EventStreamDecoder, UpstreamError, UpstreamReply, conversions};
use async_trait::async_trait;
use futures_util::StreamExt;
use moodcaster_core::{CastPrompt, SamplingProfile};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Groq's OpenAI-compatible chat completions endpoint.
pub const GROQ_CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// A chat completion provider.
///
/// The endpoint only depends on this trait so tests can substitute a stub.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Runs one chat completion for the given prompt and sampling profile.
    async fn generate(
        &self,
        prompt: &CastPrompt,
        sampling: &SamplingProfile,
    ) -> Result<UpstreamReply, UpstreamError>;

    /// Model identifier used for requests.
    fn model_name(&self) -> &str;
}

/// Generic client for any OpenAI-compatible API.
///
/// This client handles the common chat completions format used by Groq and
/// other providers. Every request is bounded by a single deadline covering
/// connection, headers and the full body.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    provider_name: &'static str,
    timeout: Duration,
    stream: bool,
}

impl OpenAICompatibleClient {
    /// Creates a new OpenAI-compatible client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key for authentication
    /// * `model` - Model identifier
    /// * `base_url` - Full URL of the chat completions endpoint
    /// * `provider_name` - Name of the provider (for logging/tracing)
    /// * `timeout` - Deadline for one complete request
    #[instrument(skip(api_key), fields(provider = provider_name, model = %model))]
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        provider_name: &'static str,
        timeout: Duration,
    ) -> Self {
        debug!(
            provider = provider_name,
            model = %model,
            url = %base_url,
            timeout_ms = timeout.as_millis() as u64,
            "Created OpenAI-compatible client"
        );

        Self {
            client: Client::new(),
            api_key,
            model,
            base_url,
            provider_name,
            timeout,
            stream: false,
        }
    }

    /// Requests server-sent events instead of a single JSON body.
    pub fn with_streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// Returns the request deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns true if streaming is requested.
    pub fn is_streaming(&self) -> bool {
        self.stream
    }

    async fn complete(
        &self,
        prompt: &CastPrompt,
        sampling: &SamplingProfile,
    ) -> Result<UpstreamReply, UpstreamError> {
        let chat_request =
            conversions::to_chat_request(prompt, sampling, &self.model, self.stream)?;

        debug!(
            provider = self.provider_name,
            model = %self.model,
            message_count = chat_request.messages().len(),
            stream = self.stream,
            "Sending request"
        );

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.provider_name, error = ?e, "HTTP request failed");
                UpstreamError::Http(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                provider = self.provider_name,
                status = %status,
                error = %error_text,
                "API error"
            );

            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let is_event_stream = content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("text/event-stream"));

        if is_event_stream {
            let mut decoder = EventStreamDecoder::new();
            let mut body = response.bytes_stream();
            while let Some(bytes) = body.next().await {
                let bytes = bytes.map_err(|e| {
                    error!(provider = self.provider_name, error = ?e, "Stream read failed");
                    UpstreamError::Http(format!("Stream read failed: {}", e))
                })?;
                decoder.feed(&bytes);
                if decoder.is_finished() {
                    break;
                }
            }
            let chunks = decoder.finish();
            debug!(provider = self.provider_name, chunks = chunks.len(), "Received stream");
            return Ok(UpstreamReply::Stream(chunks));
        }

        let body = response.text().await.map_err(|e| {
            error!(provider = self.provider_name, error = ?e, "Failed to read body");
            UpstreamError::Http(format!("Failed to read body: {}", e))
        })?;

        let reply = UpstreamReply::decode(content_type.as_deref(), &body)?;
        debug!(provider = self.provider_name, "Received response");
        Ok(reply)
    }
}

#[async_trait]
impl ChatBackend for OpenAICompatibleClient {
    #[instrument(
        skip(self, prompt, sampling),
        fields(provider = self.provider_name, model = %self.model)
    )]
    async fn generate(
        &self,
        prompt: &CastPrompt,
        sampling: &SamplingProfile,
    ) -> Result<UpstreamReply, UpstreamError> {
        match tokio::time::timeout(self.timeout, self.complete(prompt, sampling)).await {
            Ok(result) => result,
            Err(_) => {
                let ms = self.timeout.as_millis() as u64;
                warn!(provider = self.provider_name, timeout_ms = ms, "Upstream request timed out");
                Err(UpstreamError::Timeout(ms))
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
