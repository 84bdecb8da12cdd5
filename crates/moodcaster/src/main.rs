//! MoodCaster binary.

use clap::Parser;
use moodcaster::cli::{
    Cli, Commands, handle_generate_command, handle_health_command, handle_serve_command,
    handle_tasks_command,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = moodcaster_core::init_tracing(cli.json_logs) {
        eprintln!("{}", e);
    }
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Serve { bind } => handle_serve_command(bind).await.map_err(Into::into),
        Commands::Generate {
            mood,
            category,
            diverse,
            endpoint,
            timeout_secs,
            ledger,
        } => handle_generate_command(mood, category, diverse, endpoint, timeout_secs, ledger)
            .await
            .map_err(Into::into),
        Commands::Health { endpoint } => handle_health_command(endpoint).await.map_err(Into::into),
        Commands::Tasks { ledger } => handle_tasks_command(ledger).map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}
