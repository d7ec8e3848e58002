//! # Completion Trait
//!
//! [`CompletionClient`] is the only way the grading pipeline talks to a language model.
//! [`crate::llm::OpenAiClient`] is the production implementation; tests plug in scripted
//! clients.

use crate::error::MarkerError;
use async_trait::async_trait;
use serde::Serialize;

/// One system + user prompt exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A text-generation backend.
///
/// # Returns
/// - `Ok(String)`: the assistant message text.
/// - `Err(MarkerError)`: transport, status or envelope failures.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, MarkerError>;
}
