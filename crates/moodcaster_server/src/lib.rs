//! Generation endpoint for MoodCaster.
//!
//! Exposes `POST /api/generate` and `GET /api/health`. Generation requests are
//! validated, turned into a prompt, sent upstream under a deadline and, when
//! the upstream cannot produce text, answered with a templated fallback.
//!
//! # Example
//!
//! ```no_run
//! use moodcaster_server::{EndpointConfig, serve};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EndpointConfig::from_env()?;
//! serve(config).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod api;
mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod pipeline;
mod serve;

pub use api::{ApiError, AppState, create_router};
pub use config::{
    DEFAULT_BIND, DEFAULT_MODEL, DEFAULT_UPSTREAM_TIMEOUT, EndpointConfig, EndpointConfigBuilder,
};
#[cfg(feature = "metrics")]
pub use metrics::GenerationMetrics;
pub use pipeline::{GenerationPipeline, MISSING_API_KEY};
pub use serve::{serve, serve_on};
