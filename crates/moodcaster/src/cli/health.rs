//! Health command handler.

use moodcaster_client::{ClientError, HttpTransport};
use std::time::Duration;

/// Handle the `health` command
pub async fn handle_health_command(endpoint: String) -> Result<(), ClientError> {
    let transport = HttpTransport::new(endpoint, Duration::from_secs(10));
    let status = transport.health().await?;
    println!(
        "{} ok={} model={}",
        transport.endpoint(),
        status.ok,
        status.model.as_deref().unwrap_or("unknown")
    );
    Ok(())
}
