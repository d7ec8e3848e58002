//! Parser Trait
//!
//! This module defines the [`Parser`] trait, which provides a generic interface for parsing
//! raw payloads into strongly-typed Rust structures. Implementations of this trait
//! are responsible for validating the input and converting it into the appropriate domain
//! model, returning detailed errors on failure.
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//! use marker::traits::parser::Parser;
//!
//! struct TrimmedText;
//!
//! impl<'a> Parser<&'a str, String> for TrimmedText {
//!     fn parse(&self, raw: &'a str) -> Result<String, MarkerError> {
//!         let trimmed = raw.trim();
//!         if trimmed.is_empty() {
//!             return Err(MarkerError::MissingField("text".to_string()));
//!         }
//!         Ok(trimmed.to_string())
//!     }
//! }
//! ```

use crate::error::MarkerError;

/// A generic trait for parsing data into a strongly-typed Rust structure.
///
/// # Type Parameters
///
/// * `Input` - The input type to be parsed.
/// * `Output` - The output type produced by the parser.
pub trait Parser<Input, Output> {
    /// Parse an input value into the target type.
    ///
    /// # Errors
    ///
    /// Returns a [`MarkerError`] if the input does not conform to the expected schema
    /// or cannot be parsed.
    fn parse(&self, input: Input) -> Result<Output, MarkerError>;
}
