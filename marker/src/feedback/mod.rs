//! # Feedback
//!
//! - [`personalized`]: asks the model to rewrite a graded submission's feedback for the
//!   student, using their grade band and rubric results.

pub mod personalized;
