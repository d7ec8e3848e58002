//! # Parsers
//!
//! - [`grade_parser`]: interprets the free-form text of an AI grading response.
//! - [`completion_parser`]: unwraps the JSON envelope returned by a chat-completion API.

pub mod completion_parser;
pub mod grade_parser;
