//! Endpoint command handler.

use moodcaster_error::MoodcasterResult;
use moodcaster_server::{EndpointConfig, serve};
use std::net::SocketAddr;

/// Handle the `serve` command
pub async fn handle_serve_command(bind: Option<SocketAddr>) -> MoodcasterResult<()> {
    let mut config = EndpointConfig::from_env()?;
    if let Some(bind) = bind {
        config = config.with_bind(bind);
    }

    tracing::info!(bind = %config.bind(), model = %config.model(), "Starting generation endpoint");

    start_metrics();
    let result = serve(config).await;
    stop_metrics();

    result?;
    Ok(())
}

#[cfg(feature = "metrics")]
fn start_metrics() {
    if let Err(e) = moodcaster_core::init_observability("moodcaster", 60) {
        tracing::warn!(error = %e, "Metrics unavailable");
    }
}

#[cfg(not(feature = "metrics"))]
fn start_metrics() {}

#[cfg(feature = "metrics")]
fn stop_metrics() {
    moodcaster_core::shutdown_observability();
}

#[cfg(not(feature = "metrics"))]
fn stop_metrics() {}
