//! Error taxonomy for a single generation request.

/// Generation failure conditions.
///
/// `Validation` and `Configuration` are reported to the caller as-is. The
/// remaining kinds describe an upstream that could not produce text and are
/// absorbed by the fallback policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Request body missing or malformed
    #[display("{}", _0)]
    Validation(String),
    /// Server is missing required configuration
    #[display("{}", _0)]
    Configuration(String),
    /// Upstream returned a non-success status or an unusable payload
    #[display("Upstream error: {}", _0)]
    Upstream(String),
    /// Upstream did not answer before the deadline
    #[display("Upstream timeout after {}ms", _0)]
    Timeout(u64),
    /// Upstream answered but produced no text
    #[display("Upstream returned empty text")]
    EmptyResult,
}

impl GenerationErrorKind {
    /// Returns true if the endpoint should serve fallback text instead of an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodcaster_error::GenerationErrorKind;
    ///
    /// assert!(GenerationErrorKind::EmptyResult.is_degradable());
    /// assert!(GenerationErrorKind::Timeout(18_000).is_degradable());
    /// assert!(!GenerationErrorKind::Validation("Missing mood".into()).is_degradable());
    /// ```
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            GenerationErrorKind::Upstream(_)
                | GenerationErrorKind::Timeout(_)
                | GenerationErrorKind::EmptyResult
        )
    }

    /// HTTP status used when this error is surfaced rather than absorbed.
    ///
    /// Degradable kinds never reach the caller, so only validation maps to a
    /// client error.
    pub fn status_code(&self) -> u16 {
        match self {
            GenerationErrorKind::Validation(_) => 400,
            _ => 500,
        }
    }
}

/// Generation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GenerationErrorKind {
        &self.kind
    }
}

impl From<GenerationErrorKind> for GenerationError {
    #[track_caller]
    fn from(kind: GenerationErrorKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_validation_is_a_client_error() {
        assert_eq!(
            GenerationErrorKind::Validation("Missing mood".into()).status_code(),
            400
        );
        assert_eq!(
            GenerationErrorKind::Configuration("Missing GROQ_API_KEY".into()).status_code(),
            500
        );
        assert_eq!(GenerationErrorKind::Timeout(18_000).status_code(), 500);
        assert_eq!(GenerationErrorKind::EmptyResult.status_code(), 500);
    }

    #[test]
    fn test_kind_converts_with_location() {
        let err: GenerationError = GenerationErrorKind::EmptyResult.into();
        assert_eq!(err.kind(), &GenerationErrorKind::EmptyResult);
        assert!(err.file.ends_with("generation.rs"));
    }
}
