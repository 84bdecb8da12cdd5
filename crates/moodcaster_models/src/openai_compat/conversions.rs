//! Type conversions between MoodCaster prompts and OpenAI formats.

use crate::openai_compat::{ChatMessage, ChatRequest, UpstreamError};
use moodcaster_core::{CastPrompt, SamplingProfile};

/// Builds a chat completion request from a prompt pair and sampling profile.
///
/// # Errors
///
/// Returns `UpstreamError::Builder` if the request cannot be assembled.
pub fn to_chat_request(
    prompt: &CastPrompt,
    sampling: &SamplingProfile,
    model: &str,
    stream: bool,
) -> Result<ChatRequest, UpstreamError> {
    let messages = vec![
        ChatMessage::system(prompt.system().as_str()),
        ChatMessage::user(prompt.user().as_str()),
    ];

    let mut builder = ChatRequest::builder();
    builder
        .model(model.to_string())
        .messages(messages)
        .max_tokens(*sampling.max_tokens())
        .temperature(*sampling.temperature())
        .top_p(*sampling.top_p())
        .presence_penalty(*sampling.presence_penalty())
        .frequency_penalty(*sampling.frequency_penalty());

    if stream {
        builder.stream(true);
    }

    builder
        .build()
        .map_err(|e| UpstreamError::Builder(format!("Failed to build request: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use moodcaster_core::{Category, GenerationRequest, Mood};

    fn weekday() -> Weekday {
        Weekday::Wed
    }

    #[test]
    fn test_request_carries_profile() {
        let req = GenerationRequest::new(Mood::Motivated, Category::BuilderDev, true);
        let prompt = CastPrompt::build(&req, None, weekday());
        let chat = to_chat_request(&prompt, &SamplingProfile::diverse(), "llama", false).unwrap();

        assert_eq!(chat.model(), "llama");
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[0].role, "system");
        assert_eq!(*chat.temperature(), Some(0.9));
        assert_eq!(*chat.max_tokens(), Some(SamplingProfile::MAX_TOKENS));

        let json = serde_json::to_value(&chat).unwrap();
        assert!(json.get("stream").is_none());
    }

    #[test]
    fn test_stream_flag_is_serialized_when_requested() {
        let req = GenerationRequest::new(Mood::Calm, Category::GoodNight, false);
        let prompt = CastPrompt::build(&req, None, weekday());
        let chat = to_chat_request(&prompt, &SamplingProfile::standard(), "llama", true).unwrap();
        let json = serde_json::to_value(&chat).unwrap();
        assert_eq!(json["stream"], true);
    }
}
