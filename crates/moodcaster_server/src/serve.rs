//! Server lifecycle.

use crate::{AppState, EndpointConfig, create_router};
use moodcaster_error::{ServerError, ServerErrorKind};
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Binds the configured address and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server loop fails.
#[instrument(skip(config), fields(bind = %config.bind(), model = %config.model()))]
pub async fn serve(config: EndpointConfig) -> Result<(), ServerError> {
    let addr = *config.bind();
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Bind {
            addr: addr.to_string(),
            message: e.to_string(),
        })
    })?;

    serve_on(listener, AppState::from_config(config)).await
}

/// Serves the API on an already bound listener until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server loop fails.
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<(), ServerError> {
    let local = listener
        .local_addr()
        .map_err(|e| ServerError::new(ServerErrorKind::Io(e.to_string())))?;
    info!(addr = %local, "MoodCaster endpoint listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Io(e.to_string())))?;

    info!("MoodCaster endpoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
