//! Prompt construction and sampling profiles for the upstream model.

use crate::{GenerationRequest, humanize_label};
use chrono::Weekday;
use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;

/// Fixed style constraints sent as the system message.
pub const SYSTEM_INSTRUCTION: &str = "You are MoodCaster. Write a short, first-person Farcaster cast in English. \
Keep it natural and friendly, aiming for 220-280 characters. \
Use at most one relevant emoji. \
Avoid hashtags unless they are clearly beneficial. \
Never give financial advice.";

/// Extra style nudges, one of which is added to diverse requests.
pub const STYLE_HINTS: [&str; 5] = [
    "Open with a small, concrete detail from your day.",
    "End with a light question for your followers.",
    "Keep it playful and a little self-deprecating.",
    "Write it like a quick note to a friend.",
    "Lead with a surprising observation.",
];

/// System and user instructions for one generation.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct CastPrompt {
    /// Style constraints
    system: String,
    /// Mood, category and context for this request
    user: String,
}

impl CastPrompt {
    /// Builds the prompt pair with an explicit style hint and weekday.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Weekday;
    /// use moodcaster_core::{Category, GenerationRequest, Mood, CastPrompt};
    ///
    /// let req = GenerationRequest::new(Mood::Calm, Category::GoodMorning, false);
    /// let prompt = CastPrompt::build(&req, None, Weekday::Fri);
    /// assert!(prompt.user().contains("Mood: Calm"));
    /// assert!(prompt.user().contains("Category: Good Morning"));
    /// assert!(prompt.user().contains("Friday"));
    /// ```
    pub fn build(request: &GenerationRequest, style_hint: Option<&str>, weekday: Weekday) -> Self {
        let mut user = format!(
            "Mood: {}\nCategory: {}\nToday is {}.\n",
            humanize_label(&request.mood),
            humanize_label(&request.category),
            weekday_name(weekday),
        );
        if let Some(hint) = style_hint {
            user.push_str(&format!("Style: {}\n", hint));
        }
        if let Some(extra) = request.prompt_hint() {
            user.push_str(&format!("Extra guidance: {}\n", extra));
        }
        user.push_str(
            "Constraints: stay under 280 characters; one emoji max; no hashtags unless they add value.",
        );

        Self {
            system: SYSTEM_INSTRUCTION.to_string(),
            user,
        }
    }

    /// Builds the prompt pair, picking a style hint at random for diverse requests.
    pub fn for_request<R: Rng + ?Sized>(
        request: &GenerationRequest,
        rng: &mut R,
        weekday: Weekday,
    ) -> Self {
        let hint = if request.diverse {
            STYLE_HINTS.choose(rng).copied()
        } else {
            None
        };
        Self::build(request, hint, weekday)
    }
}

/// Sampling parameters sent with the chat completion.
#[derive(Debug, Clone, Copy, PartialEq, Getters)]
pub struct SamplingProfile {
    /// Sampling temperature
    temperature: f32,
    /// Nucleus sampling cutoff
    top_p: f32,
    /// Penalty for reusing topics
    presence_penalty: f32,
    /// Penalty for repeating tokens
    frequency_penalty: f32,
    /// Completion token budget
    max_tokens: u32,
}

impl SamplingProfile {
    /// Token budget kept small to bound latency.
    pub const MAX_TOKENS: u32 = 160;

    /// Profile for regular requests.
    pub fn standard() -> Self {
        Self {
            temperature: 0.6,
            top_p: 0.9,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            max_tokens: Self::MAX_TOKENS,
        }
    }

    /// Profile for "more diverse" requests.
    pub fn diverse() -> Self {
        Self {
            temperature: 0.9,
            top_p: 0.95,
            presence_penalty: 0.6,
            frequency_penalty: 0.4,
            max_tokens: Self::MAX_TOKENS,
        }
    }

    /// Selects the profile for a request.
    pub fn for_request(request: &GenerationRequest) -> Self {
        if request.diverse {
            Self::diverse()
        } else {
            Self::standard()
        }
    }
}

/// Full English weekday name.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
