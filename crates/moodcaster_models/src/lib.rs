//! Upstream provider integrations for MoodCaster.
//!
//! The endpoint talks to any OpenAI-compatible chat completions API (Groq by
//! default) through the [`ChatBackend`] trait.

mod openai_compat;

pub use openai_compat::{
    ChatBackend, ChatChoice, ChatCompletionChunk, ChatMessage, ChatRequest, ChatRequestBuilder,
    ChatResponse, ChatUsage, ChunkChoice, Delta, EventStreamDecoder, GROQ_CHAT_COMPLETIONS_URL,
    OpenAICompatibleClient, ResponseMessage, STREAM_TERMINATOR, UpstreamError, UpstreamReply,
    decode_event_stream, to_chat_request,
};
