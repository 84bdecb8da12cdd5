//! Generate command handler.

use crate::cli::open_ledger;
use moodcaster_client::{ClientError, Orchestrator, OrchestratorConfig, Task, UserNotice};
use moodcaster_core::{Category, Mood};
use std::path::PathBuf;
use std::time::Duration;

/// Handle the `generate` command
///
/// Prints the draft on success and the user notice on failure.
#[tracing::instrument(skip_all, fields(mood = %mood, category = %category, diverse = diverse))]
pub async fn handle_generate_command(
    mood: Mood,
    category: Category,
    diverse: bool,
    endpoint: String,
    timeout_secs: u64,
    ledger: Option<PathBuf>,
) -> Result<(), ClientError> {
    let config = OrchestratorConfig::builder()
        .endpoint(endpoint)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default();
    let orchestrator = Orchestrator::from_config(&config);

    match orchestrator.generate(mood, category, diverse).await {
        Ok(text) => {
            println!("{}", text);
            if let Err(e) = open_ledger(ledger).mark_done(Task::Generate) {
                tracing::warn!(error = %e, "Failed to record generate task");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", UserNotice::from_client_error(&e));
            Err(e)
        }
    }
}
