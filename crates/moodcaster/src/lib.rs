//! MoodCaster command-line interface.
//!
//! Runs the generation endpoint or talks to one as a client.

pub mod cli;
