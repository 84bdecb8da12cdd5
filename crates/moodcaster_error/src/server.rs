//! Server lifecycle error types.

/// Server error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ServerErrorKind {
    /// Invalid or missing configuration
    #[display("Configuration error: {}", _0)]
    Configuration(String),
    /// Failed to bind the listening socket
    #[display("Failed to bind {}: {}", addr, message)]
    Bind {
        /// Address that could not be bound
        addr: String,
        /// Underlying error message
        message: String,
    },
    /// The server loop terminated with an I/O error
    #[display("Server I/O error: {}", _0)]
    Io(String),
    /// The upstream client could not be constructed
    #[display("Upstream client error: {}", _0)]
    Upstream(String),
}

/// Server error with location tracking.
///
/// # Examples
///
/// ```
/// use moodcaster_error::{ServerError, ServerErrorKind};
///
/// let err = ServerError::new(ServerErrorKind::Io("connection reset".to_string()));
/// assert!(format!("{}", err).contains("connection reset"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Server Error: {} at line {} in {}", kind, line, file)]
pub struct ServerError {
    /// The kind of error that occurred
    pub kind: ServerErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ServerError {
    /// Create a new ServerError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
