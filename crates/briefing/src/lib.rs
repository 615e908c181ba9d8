//! LLM-backed briefing generation for suite runs: post-run debriefs and
//! risk maps via an OpenRouter-compatible chat completions API.

mod client;
mod error;
mod generator;
pub mod prompts;
mod types;

pub use client::OpenRouterClient;
pub use error::{BriefingError, BriefingResult};
pub use generator::{Briefing, BriefingGenerator, BriefingKind};
pub use types::*;
