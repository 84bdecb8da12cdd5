//! Posting through the host social-network SDK.
//!
//! Capabilities are negotiated once when a [`CastPoster`] connects. Posting
//! prefers the host's native composer and falls back to opening the web
//! composer URL.

use crate::{HostError, HostErrorKind};
use async_trait::async_trait;
use moodcaster_core::{MAX_CAST_CHARS, truncate_chars};
use std::collections::BTreeSet;
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{debug, info, instrument, warn};

/// Base URL of the web composer used when the host cannot compose natively.
pub const WEB_COMPOSER_URL: &str = "https://warpcast.com/~/compose";

/// An action the host may offer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum HostCapability {
    /// Native cast composer
    #[strum(serialize = "actions.composeCast")]
    ComposeCast,
    /// Opening external URLs
    #[strum(serialize = "actions.openUrl")]
    OpenUrl,
    /// Haptic feedback
    #[strum(serialize = "haptics.notificationOccurred")]
    Haptics,
    /// Adding the mini app to the user's apps
    #[strum(serialize = "actions.addMiniApp")]
    AddMiniApp,
}

/// Capabilities reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostCapabilities(BTreeSet<HostCapability>);

impl HostCapabilities {
    /// Returns true if the host offers `capability`.
    pub fn supports(&self, capability: HostCapability) -> bool {
        self.0.contains(&capability)
    }

    /// Number of capabilities.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the host offers nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<HostCapability> for HostCapabilities {
    fn from_iter<I: IntoIterator<Item = HostCapability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of the native composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeOutcome {
    /// The user sent the cast
    Posted,
    /// The user closed the composer
    Cancelled,
}

/// Host social-network SDK.
#[async_trait]
pub trait HostSdk: Send + Sync {
    /// Actions the host offers.
    async fn capabilities(&self) -> Result<Vec<HostCapability>, HostError>;

    /// Returns true when running inside the host app.
    async fn is_in_host(&self) -> bool;

    /// Signals that the app finished loading.
    async fn ready(&self) -> Result<(), HostError>;

    /// Opens the native composer prefilled with `text`.
    async fn compose_cast(&self, text: &str) -> Result<ComposeOutcome, HostError>;

    /// Opens an external URL.
    async fn open_url(&self, url: &str) -> Result<(), HostError>;

    /// Plays a success haptic.
    async fn notify_success(&self) -> Result<(), HostError>;

    /// Adds the mini app to the user's apps.
    async fn add_mini_app(&self) -> Result<(), HostError>;
}

/// Result of [`CastPoster::post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// Sent through the native composer
    Composed,
    /// The user closed the native composer
    Cancelled,
    /// The web composer was opened at `url`
    ComposerOpened {
        /// Prefilled composer URL
        url: String,
    },
    /// The host could not open the web composer; the caller must open `url`
    ComposerLink {
        /// Prefilled composer URL
        url: String,
    },
}

impl PostOutcome {
    /// Returns true when the cast left the app.
    pub fn is_posted(&self) -> bool {
        matches!(
            self,
            PostOutcome::Composed | PostOutcome::ComposerOpened { .. }
        )
    }
}

/// Web composer URL prefilled with `text`.
///
/// # Examples
///
/// ```
/// use moodcaster_client::composer_url;
///
/// assert_eq!(
///     composer_url("gm & wagmi"),
///     "https://warpcast.com/~/compose?text=gm%20%26%20wagmi"
/// );
/// ```
pub fn composer_url(text: &str) -> String {
    format!("{}?text={}", WEB_COMPOSER_URL, urlencoding::encode(text))
}

/// Posts casts through a host SDK.
#[derive(Clone)]
pub struct CastPoster {
    sdk: Arc<dyn HostSdk>,
    capabilities: HostCapabilities,
}

impl CastPoster {
    /// Negotiates capabilities with the host.
    ///
    /// A host that fails to report capabilities is treated as offering none.
    #[instrument(skip(sdk))]
    pub async fn connect(sdk: Arc<dyn HostSdk>) -> Self {
        let capabilities = match sdk.capabilities().await {
            Ok(list) => list.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, "Host capabilities unavailable");
                HostCapabilities::default()
            }
        };
        debug!(count = capabilities.len(), "Negotiated host capabilities");
        Self { sdk, capabilities }
    }

    /// Capabilities negotiated at connect time.
    pub fn capabilities(&self) -> &HostCapabilities {
        &self.capabilities
    }

    /// Underlying SDK.
    pub fn sdk(&self) -> &Arc<dyn HostSdk> {
        &self.sdk
    }

    /// Posts a cast.
    ///
    /// The text is trimmed and capped at 280 characters. The native composer
    /// is tried first when available; if it is missing or fails, the web
    /// composer is opened instead. When the host cannot open it either, the
    /// prefilled link is returned as [`PostOutcome::ComposerLink`].
    ///
    /// # Errors
    ///
    /// Returns `EmptyCast` when nothing is left after trimming.
    #[instrument(skip(self, text))]
    pub async fn post(&self, text: &str) -> Result<PostOutcome, HostError> {
        let message = truncate_chars(text.trim(), MAX_CAST_CHARS);
        if message.is_empty() {
            return Err(HostError::new(HostErrorKind::EmptyCast));
        }

        if self.capabilities.supports(HostCapability::ComposeCast) {
            match self.sdk.compose_cast(message).await {
                Ok(ComposeOutcome::Cancelled) => {
                    info!("Composer cancelled");
                    return Ok(PostOutcome::Cancelled);
                }
                Ok(ComposeOutcome::Posted) => {
                    if self.capabilities.supports(HostCapability::Haptics) {
                        if let Err(e) = self.sdk.notify_success().await {
                            debug!(error = %e, "Haptic feedback failed");
                        }
                    }
                    info!("Cast composed");
                    return Ok(PostOutcome::Composed);
                }
                Err(e) => warn!(error = %e, "Native composer failed, opening web composer"),
            }
        }

        let url = composer_url(message);
        if !self.capabilities.supports(HostCapability::OpenUrl) {
            info!("Host cannot open URLs, returning composer link");
            return Ok(PostOutcome::ComposerLink { url });
        }
        match self.sdk.open_url(&url).await {
            Ok(()) => {
                info!("Web composer opened");
                Ok(PostOutcome::ComposerOpened { url })
            }
            Err(e) => {
                warn!(error = %e, "Failed to open web composer");
                Ok(PostOutcome::ComposerLink { url })
            }
        }
    }

    /// Adds the mini app to the user's apps.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` when the host lacks the capability, otherwise any
    /// SDK failure.
    pub async fn add_mini_app(&self) -> Result<(), HostError> {
        if !self.capabilities.supports(HostCapability::AddMiniApp) {
            return Err(HostError::new(HostErrorKind::Unsupported(
                HostCapability::AddMiniApp.to_string(),
            )));
        }
        self.sdk.add_mini_app().await
    }
}

impl std::fmt::Debug for CastPoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CastPoster")
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
