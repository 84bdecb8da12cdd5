//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the moodcaster binary.

mod commands;
mod generate;
mod health;
mod serve;
mod tasks;

pub use commands::{Cli, Commands};
pub use generate::handle_generate_command;
pub use health::handle_health_command;
pub use serve::handle_serve_command;
pub use tasks::{handle_tasks_command, open_ledger};
