//! Data transfer objects for OpenAI-compatible APIs.

use derive_builder::Builder;
use derive_getters::Getters;
use moodcaster_error::{GenerationError, GenerationErrorKind};
use serde::{Deserialize, Serialize};

/// A message in the OpenAI chat format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// OpenAI chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Nucleus sampling cutoff
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    /// Penalty for reusing topics
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    /// Penalty for repeating tokens
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    /// Enable streaming
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

impl ChatRequest {
    /// Creates a new builder for ChatRequest.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// Message inside a completion choice.
///
/// Providers occasionally send `null` content, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseMessage {
    /// Role of the author
    #[serde(default)]
    pub role: Option<String>,
    /// Generated content
    #[serde(default)]
    pub content: Option<String>,
}

/// A choice in the OpenAI response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatChoice {
    /// The message content
    #[serde(default)]
    pub message: ResponseMessage,
    /// Reason for finishing
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: Option<usize>,
    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: Option<usize>,
    /// Total tokens
    #[serde(default)]
    pub total_tokens: Option<usize>,
}

/// OpenAI chat completion response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    /// Response choices
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

/// Incremental content in a streaming chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Delta {
    /// Role (only in first chunk)
    #[serde(default)]
    pub role: Option<String>,
    /// Incremental content
    #[serde(default)]
    pub content: Option<String>,
}

/// A choice in a streaming chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChunkChoice {
    /// Delta content
    #[serde(default)]
    pub delta: Delta,
    /// Finish reason (if complete)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// One `data:` frame of a streamed chat completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatCompletionChunk {
    /// Delta choices
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

impl ChatCompletionChunk {
    /// Text carried by the first choice of this frame.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
    }
}

/// Errors from OpenAI-compatible APIs.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum UpstreamError {
    /// HTTP/network error
    #[display("HTTP error: {}", _0)]
    Http(String),

    /// No complete answer before the deadline
    #[display("Upstream timeout after {}ms", _0)]
    Timeout(u64),

    /// API returned an error
    #[display("API error (status {}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Response declared a content type we cannot decode
    #[display("Unsupported content type: {}", _0)]
    UnsupportedContentType(String),

    /// Failed to parse response
    #[display("Response parsing failed: {}", _0)]
    ResponseParsing(String),

    /// Builder error
    #[display("Builder error: {}", _0)]
    Builder(String),
}

impl std::error::Error for UpstreamError {}

impl From<UpstreamError> for GenerationError {
    #[track_caller]
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout(ms) => GenerationError::new(GenerationErrorKind::Timeout(ms)),
            other => GenerationError::new(GenerationErrorKind::Upstream(other.to_string())),
        }
    }
}
