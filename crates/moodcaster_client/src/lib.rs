//! Client side of MoodCaster.
//!
//! The [`Orchestrator`] sends generation requests with a deadline and
//! bounded retries and turns the endpoint's answer into draft text. A
//! [`Session`] drives the mood, category and preview steps, posts through the
//! host SDK via [`CastPoster`] and records daily tasks in a [`TaskLedger`].
//!
//! # Example
//!
//! ```no_run
//! use moodcaster_client::{Orchestrator, OrchestratorConfig};
//! use moodcaster_core::{Category, Mood};
//!
//! # async fn run() -> Result<(), moodcaster_client::ClientError> {
//! let orchestrator = Orchestrator::from_config(&OrchestratorConfig::default());
//! let draft = orchestrator.generate(Mood::Calm, Category::GoodMorning, false).await?;
//! println!("{}", draft);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod host;
mod ledger;
mod notice;
mod orchestrator;
mod retry;
mod session;
mod transport;

pub use error::{
    ClientError, ClientErrorKind, HostError, HostErrorKind, LedgerError, LedgerErrorKind,
};
pub use host::{
    CastPoster, ComposeOutcome, HostCapabilities, HostCapability, HostSdk, PostOutcome,
    WEB_COMPOSER_URL, composer_url,
};
pub use ledger::{
    BONUS_POST_THRESHOLD, DayRecord, DayRecordRepository, InMemoryDayRecords, JsonFileDayRecords,
    Task, TaskLedger,
};
pub use notice::{LogNotifier, Notifier, UserNotice};
pub use orchestrator::{
    DEFAULT_CLIENT_TIMEOUT, DEFAULT_ENDPOINT, Orchestrator, OrchestratorConfig,
    OrchestratorConfigBuilder, interpret,
};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use session::{Session, Step};
pub use transport::{GenerateTransport, HealthStatus, HttpTransport, TransportResponse};
