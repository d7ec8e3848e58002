//! Text helpers shared by the parsers.

pub mod sentences;
