//! Shared runtime plumbing for the grading workspace: environment-driven
//! configuration and logging setup.

pub mod config;
pub mod logging;
