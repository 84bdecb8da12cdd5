//! Plain-language notices shown to the user.

use crate::{ClientError, ClientErrorKind};
use moodcaster_error::RetryableError;
use tracing::{info, warn};

/// A message for the user. Errors never cross the session boundary in any
/// other form.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum UserNotice {
    /// The endpoint answered too slowly
    #[display("The server responded slowly (timeout). Try again.")]
    Timeout,
    /// The endpoint refused the request
    #[display("Could not generate text: {}", _0)]
    Rejected(String),
    /// Any other generation failure
    #[display("Text generation failed. Try again.")]
    GenerationFailed,
    /// Post attempted with an empty draft
    #[display("Nothing to post yet.")]
    EmptyCast,
    /// The host composer opened or the cast was sent
    #[display("Cast composer opened.")]
    Posted,
    /// Posting failed
    #[display("Could not post. Try again inside the host app.")]
    PostFailed,
    /// The mini app was added to the host
    #[display("Added to your apps.")]
    Added,
    /// The host cannot add mini apps
    #[display("Adding the mini app is not supported in this host.")]
    AddUnsupported,
    /// Adding the mini app failed
    #[display("Could not add the mini app.")]
    AddFailed,
}

impl UserNotice {
    /// Maps a failed generation to a notice.
    ///
    /// Timeouts are recognised by kind or by timeout/abort markers in the
    /// message, so an endpoint-reported upstream timeout reads the same as a
    /// client-side one.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodcaster_client::{ClientError, ClientErrorKind, UserNotice};
    ///
    /// let err = ClientError::new(ClientErrorKind::Timeout(20_000));
    /// assert_eq!(UserNotice::from_client_error(&err), UserNotice::Timeout);
    /// ```
    pub fn from_client_error(err: &ClientError) -> Self {
        if err.is_timeout() {
            return UserNotice::Timeout;
        }
        match err.kind() {
            ClientErrorKind::Remote { message, .. } => UserNotice::Rejected(message.clone()),
            _ => UserNotice::GenerationFailed,
        }
    }

    /// Returns true for notices reporting a failure.
    pub fn is_error(&self) -> bool {
        !matches!(self, UserNotice::Posted | UserNotice::Added)
    }
}

/// Receives notices raised by a [`Session`](crate::Session).
pub trait Notifier: Send + Sync {
    /// Shows a notice to the user.
    fn notify(&self, notice: UserNotice);
}

/// Notifier that writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: UserNotice) {
        if notice.is_error() {
            warn!(notice = %notice, "User notice");
        } else {
            info!(notice = %notice, "User notice");
        }
    }
}
