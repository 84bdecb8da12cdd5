//! Request and result types exchanged with the generation endpoint.

use crate::{Category, Mood};
use moodcaster_error::{GenerationError, GenerationErrorKind};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
///
/// Fields default to empty so that a body missing `mood` or `category`
/// reaches [`GenerationRequest::validate`] instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Mood key, e.g. `"calm"`
    #[serde(default)]
    pub mood: String,
    /// Category key, e.g. `"good_morning"`
    #[serde(default)]
    pub category: String,
    /// Raise sampling temperature and penalties
    #[serde(default)]
    pub diverse: bool,
    /// Optional free-text style hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl GenerationRequest {
    /// Creates a request from typed selections.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodcaster_core::{Category, GenerationRequest, Mood};
    ///
    /// let req = GenerationRequest::new(Mood::Calm, Category::GoodMorning, false);
    /// assert_eq!(req.mood, "calm");
    /// assert_eq!(req.category, "good_morning");
    /// assert!(req.validate().is_ok());
    /// ```
    pub fn new(mood: Mood, category: Category, diverse: bool) -> Self {
        Self {
            mood: mood.key().to_string(),
            category: category.key().to_string(),
            diverse,
            prompt: None,
        }
    }

    /// Attaches a free-text style hint.
    pub fn with_prompt(self, prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..self
        }
    }

    /// Checks that both mood and category are present.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if either field is blank.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.mood.trim().is_empty() || self.category.trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::Validation(
                "Missing mood or category".to_string(),
            )));
        }
        Ok(())
    }

    /// Free-text hint, if one was supplied and is not blank.
    pub fn prompt_hint(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
    }
}

/// Successful body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Cast text, never empty
    pub text: String,
    /// True when the text was synthesised locally instead of by the model
    #[serde(default)]
    pub fallback: bool,
    /// Underlying error message for fallback responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl GenerationResult {
    /// Text produced by the upstream model.
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback: false,
            detail: None,
        }
    }

    /// Locally synthesised text with the reason the model was bypassed.
    pub fn fallback(text: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback: true,
            detail: Some(detail.into()),
        }
    }
}
