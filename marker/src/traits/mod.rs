//!
//! Traits Module
//!
//! This module contains core traits used throughout the marker system for extensibility and abstraction.
//!
//! - [`completion`]: The seam between the grading pipeline and an LLM provider.
//! - [`parser`]: Defines the generic trait for parsing raw provider payloads into Rust types.
//!
//! Implement these traits to plug in a different provider or payload format.

pub mod completion;
pub mod parser;
