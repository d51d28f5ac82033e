//! Domain logic for yoga sequence generation.
//!
//! This crate is free of I/O except for [`guidelines`] (file read). The
//! generation pipeline is a straight-line transformation:
//!
//! ```text
//! params -> prompt -> (LLM, in yogaflow-llm) -> parser -> matcher -> assembler
//! ```
//!
//! with [`fallback`] providing the rule-based path when no LLM is available.

pub mod assembler;
pub mod catalog;
pub mod error;
pub mod fallback;
pub mod guidelines;
pub mod matcher;
pub mod params;
pub mod parser;
pub mod prompt;
pub mod types;
