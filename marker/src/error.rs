//! Marker Error Types
//!
//! This module defines the [`MarkerError`] enum, which covers everything that can go wrong
//! around an AI grading call: configuration, transport, the completion envelope, and
//! assignment or submission data that cannot be graded.
//!
//! Interpreting the text of a grading response never produces an error. A response with no
//! recognisable grade is a data-level outcome (manual review), see
//! [`crate::parsers::grade_parser`].
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//!
//! fn require_content(content: &str) -> Result<(), MarkerError> {
//!     if content.is_empty() {
//!         return Err(MarkerError::MissingField("submission content".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Represents all error types that can occur in the grading pipeline.
#[derive(Debug, Error)]
pub enum MarkerError {
    /// `OPENAI_API_KEY` is not configured.
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(String),
    /// The completion endpoint answered with a non-success status.
    #[error("AI API error (status {status}): {body}")]
    Api { status: u16, body: String },
    /// JSON is malformed or does not match the expected schema.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// The completion envelope carried no message content.
    #[error("AI response contained no message content")]
    EmptyCompletion,
    /// AI grading is switched off for this assignment.
    #[error("AI grading is disabled for assignment {0}")]
    AiGradingDisabled(String),
    /// Assignment data cannot be graded (e.g. non-positive total points).
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),
    /// A required field is missing from input.
    #[error("missing field: {0}")]
    MissingField(String),
}

impl From<reqwest::Error> for MarkerError {
    fn from(err: reqwest::Error) -> Self {
        MarkerError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for MarkerError {
    fn from(err: serde_json::Error) -> Self {
        MarkerError::InvalidJson(err.to_string())
    }
}
