//! Error types for the MoodCaster workspace.
//!
//! Every error records the file and line where it was constructed. Crate-level
//! variants are collected in [`MoodcasterErrorKind`] so binaries can propagate
//! any of them with `?`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod generation;
mod retry;
mod server;

pub use config::ConfigError;
pub use generation::{GenerationError, GenerationErrorKind};
pub use retry::RetryableError;
pub use server::{ServerError, ServerErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum MoodcasterErrorKind {
    /// Configuration error
    #[display("{}", _0)]
    Config(ConfigError),
    /// Server lifecycle error
    #[display("{}", _0)]
    Server(ServerError),
    /// Generation pipeline error
    #[display("{}", _0)]
    Generation(GenerationError),
}

/// MoodCaster error with kind discrimination.
#[derive(Debug)]
pub struct MoodcasterError(Box<MoodcasterErrorKind>);

impl MoodcasterError {
    /// Create a new error from a kind.
    pub fn new(kind: MoodcasterErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MoodcasterErrorKind {
        &self.0
    }
}

impl std::fmt::Display for MoodcasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MoodCaster Error: {}", self.0)
    }
}

impl std::error::Error for MoodcasterError {}

impl<T> From<T> for MoodcasterError
where
    T: Into<MoodcasterErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for MoodCaster operations.
pub type MoodcasterResult<T> = std::result::Result<T, MoodcasterError>;
