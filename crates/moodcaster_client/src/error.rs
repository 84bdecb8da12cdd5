//! Error types for the client side of MoodCaster.

use moodcaster_error::RetryableError;

/// Client request failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ClientErrorKind {
    /// No response before the deadline
    #[display("Request timeout after {}ms", _0)]
    Timeout(u64),
    /// Connection could not be established or was dropped
    #[display("Network error: {}", _0)]
    Network(String),
    /// The endpoint answered with an error
    #[display("{}", message)]
    Remote {
        /// HTTP status code
        status: u16,
        /// Error message from the body, or the status reason
        message: String,
    },
    /// The endpoint answered successfully but the body was unusable
    #[display("Invalid response: {}", _0)]
    InvalidResponse(String),
}

/// Client error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Client Error: {} at line {} in {}", kind, line, file)]
pub struct ClientError {
    /// The kind of error that occurred
    pub kind: ClientErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ClientError {
    /// Create a new ClientError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ClientErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ClientErrorKind {
        &self.kind
    }
}

impl From<ClientErrorKind> for ClientError {
    #[track_caller]
    fn from(kind: ClientErrorKind) -> Self {
        Self::new(kind)
    }
}

impl RetryableError for ClientError {
    fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ClientErrorKind::Timeout(_) | ClientErrorKind::Network(_)
        )
    }

    fn is_timeout(&self) -> bool {
        if matches!(self.kind, ClientErrorKind::Timeout(_)) {
            return true;
        }
        let message = self.kind.to_string().to_ascii_lowercase();
        message.contains("timeout") || message.contains("timed out") || message.contains("abort")
    }
}

/// Host SDK failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HostErrorKind {
    /// Nothing left to post after trimming
    #[display("Empty cast text")]
    EmptyCast,
    /// The host does not offer the requested action
    #[display("Host does not support {}", _0)]
    Unsupported(String),
    /// The host action failed
    #[display("Host SDK error: {}", _0)]
    Sdk(String),
}

/// Host error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Host Error: {} at line {} in {}", kind, line, file)]
pub struct HostError {
    /// The kind of error that occurred
    pub kind: HostErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl HostError {
    /// Create a new HostError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: HostErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HostErrorKind {
        &self.kind
    }
}

/// Task ledger storage failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum LedgerErrorKind {
    /// Reading or writing the ledger file failed
    #[display("Ledger I/O error: {}", _0)]
    Io(String),
    /// The ledger could not be serialized
    #[display("Ledger serialization error: {}", _0)]
    Serialization(String),
}

/// Ledger error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Ledger Error: {} at line {} in {}", kind, line, file)]
pub struct LedgerError {
    /// The kind of error that occurred
    pub kind: LedgerErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl LedgerError {
    /// Create a new LedgerError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LedgerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_failures_retry() {
        assert!(ClientError::new(ClientErrorKind::Timeout(20_000)).is_retryable());
        assert!(ClientError::new(ClientErrorKind::Network("refused".into())).is_retryable());
        assert!(
            !ClientError::new(ClientErrorKind::Remote {
                status: 400,
                message: "Missing mood or category".into()
            })
            .is_retryable()
        );
        assert!(!ClientError::new(ClientErrorKind::InvalidResponse("empty".into())).is_retryable());
    }

    #[test]
    fn test_timeout_markers_in_messages() {
        let remote = ClientError::new(ClientErrorKind::Remote {
            status: 504,
            message: "Upstream timeout".into(),
        });
        assert!(remote.is_timeout());

        let aborted = ClientError::new(ClientErrorKind::Network("request aborted".into()));
        assert!(aborted.is_timeout());

        let refused = ClientError::new(ClientErrorKind::Network("connection refused".into()));
        assert!(!refused.is_timeout());
    }
}
