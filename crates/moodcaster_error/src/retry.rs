//! Retry classification shared by client-side error types.

/// Trait for errors that support retry logic.
///
/// Transport failures such as timeouts or refused connections are transient
/// and should return true. Errors reported by the remote service (a non-success
/// status or an `error` field in the payload) are final.
///
/// # Examples
///
/// ```
/// use moodcaster_error::RetryableError;
///
/// struct Refused;
///
/// impl RetryableError for Refused {
///     fn is_retryable(&self) -> bool {
///         true
///     }
/// }
///
/// assert!(Refused.is_retryable());
/// assert!(!Refused.is_timeout());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Returns true if this error was caused by a deadline or abort.
    fn is_timeout(&self) -> bool {
        false
    }
}
