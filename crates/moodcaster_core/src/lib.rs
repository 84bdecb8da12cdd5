//! Core data types for MoodCaster.
//!
//! This crate holds everything the client and the endpoint agree on: the
//! mood and category enumerations, the request/result wire types, prompt
//! construction, sampling profiles and the fallback sentence templates.

mod fallback;
mod observability;
mod prompt;
mod request;
mod selection;
mod text;

pub use fallback::{FALLBACK_TEMPLATE_COUNT, fallback_candidates, fallback_text};
pub use observability::{init_observability, init_tracing, shutdown_observability};
pub use prompt::{CastPrompt, STYLE_HINTS, SYSTEM_INSTRUCTION, SamplingProfile, weekday_name};
pub use request::{GenerationRequest, GenerationResult};
pub use selection::{Category, Mood};
pub use text::{MAX_CAST_CHARS, humanize_label, normalize_cast, truncate_chars};
