//! Chat-completion client for OpenAI-compatible endpoints.
//!
//! The generation pipeline treats the model as optional: when no API key is
//! configured the server runs entirely on the rule-based assembler, so this
//! crate exposes configuration as `Option` rather than failing startup.

mod client;
mod error;

pub use client::{LlmClient, LlmConfig};
pub use error::LlmError;
