//! Decoded upstream replies.

use crate::openai_compat::{ChatCompletionChunk, ChatResponse, UpstreamError, decode_event_stream};
use tracing::debug;

/// A chat completion as delivered by the upstream, either whole or streamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamReply {
    /// A single JSON completion
    Json(ChatResponse),
    /// Server-sent event frames in arrival order
    Stream(Vec<ChatCompletionChunk>),
}

impl UpstreamReply {
    /// Decodes a response body according to its declared content type.
    ///
    /// A missing or empty content type is sniffed: bodies whose first
    /// non-blank line starts with `data:` are treated as a stream.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedContentType` for any other declared media type and
    /// `ResponseParsing` if a JSON body is malformed.
    pub fn decode(content_type: Option<&str>, body: &str) -> Result<Self, UpstreamError> {
        let media_type = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match media_type.as_str() {
            "text/event-stream" => Ok(Self::Stream(decode_event_stream(body))),
            "application/json" => Self::decode_json(body),
            "" if body.trim_start().starts_with("data:") => {
                debug!("Sniffed event stream from body");
                Ok(Self::Stream(decode_event_stream(body)))
            }
            "" => Self::decode_json(body),
            other => Err(UpstreamError::UnsupportedContentType(other.to_string())),
        }
    }

    fn decode_json(body: &str) -> Result<Self, UpstreamError> {
        serde_json::from_str(body)
            .map(Self::Json)
            .map_err(|e| UpstreamError::ResponseParsing(format!("Failed to parse JSON: {}", e)))
    }

    /// Generated text with surrounding whitespace removed.
    ///
    /// Streams are concatenated in order. The result may be empty.
    pub fn text(&self) -> String {
        match self {
            Self::Json(response) => response
                .choices
                .first()
                .and_then(|choice| choice.message.content.as_deref())
                .unwrap_or_default()
                .trim()
                .to_string(),
            Self::Stream(chunks) => chunks
                .iter()
                .filter_map(ChatCompletionChunk::text)
                .collect::<String>()
                .trim()
                .to_string(),
        }
    }
}
