//! Generic OpenAI-compatible API client.
//!
//! Replies are decoded once at the boundary into [`UpstreamReply`], so text
//! extraction does not care whether the provider answered with a single JSON
//! document or a server-sent event stream.

mod client;
mod conversions;
mod dto;
mod reply;
mod stream;

pub use client::{ChatBackend, GROQ_CHAT_COMPLETIONS_URL, OpenAICompatibleClient};
pub use conversions::to_chat_request;
pub use dto::{
    ChatChoice, ChatCompletionChunk, ChatMessage, ChatRequest, ChatRequestBuilder, ChatResponse,
    ChatUsage, ChunkChoice, Delta, ResponseMessage, UpstreamError,
};
pub use reply::UpstreamReply;
pub use stream::{EventStreamDecoder, STREAM_TERMINATOR, decode_event_stream};
