//! # Marker Library
//!
//! This crate grades student submissions with a large language model and turns the model's
//! free-form answer into structured grades.
//!
//! ## Key Concepts
//! - **GradeParser**: interprets grading text into an overall grade, per-criterion scores and
//!   per-criterion feedback ([`parsers::grade_parser`]). Pure and deterministic.
//! - **CompletionClient**: the seam to the model provider ([`traits::completion`]), with an
//!   OpenAI-compatible implementation in [`llm`].
//! - **GradingJob**: grades one submission end to end ([`grading`]).
//! - **bulk_grade**: grades every ungraded submission of an assignment sequentially, isolating
//!   failures ([`bulk`]).
//! - **Reports**: serializable output envelopes ([`report`]).

pub mod bulk;
pub mod error;
pub mod feedback;
pub mod grading;
pub mod llm;
pub mod parsers;
pub mod prompt;
pub mod report;
pub mod traits;
pub mod types;
pub mod utilities;

pub use crate::parsers::grade_parser::{GradeInterpretation, GradeParser, interpret};
