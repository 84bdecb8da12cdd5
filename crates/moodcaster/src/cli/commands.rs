//! Command definitions.

use clap::{Parser, Subcommand};
use moodcaster_client::DEFAULT_ENDPOINT;
use moodcaster_core::{Category, Mood};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Draft short social posts from a mood and a category.
#[derive(Debug, Parser)]
#[command(name = "moodcaster", version, about, long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the generation endpoint
    Serve {
        /// Listen address, overriding MOODCASTER_BIND
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Request one draft from an endpoint
    Generate {
        /// Mood key, e.g. calm or low_key
        #[arg(long)]
        mood: Mood,

        /// Category key, e.g. good_morning or web3_tips
        #[arg(long)]
        category: Category,

        /// Use more diverse sampling
        #[arg(long)]
        diverse: bool,

        /// Endpoint base URL
        #[arg(long, env = "MOODCASTER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Seconds to wait for each attempt
        #[arg(long, default_value_t = 20)]
        timeout_secs: u64,

        /// Task ledger file
        #[arg(long, env = "MOODCASTER_LEDGER")]
        ledger: Option<PathBuf>,
    },

    /// Check that an endpoint is up
    Health {
        /// Endpoint base URL
        #[arg(long, env = "MOODCASTER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
    },

    /// Show today's points, total points and streak
    Tasks {
        /// Task ledger file
        #[arg(long, env = "MOODCASTER_LEDGER")]
        ledger: Option<PathBuf>,
    },
}
