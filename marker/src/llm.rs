//! # OpenAI Chat-Completion Client
//!
//! [`OpenAiClient`] implements [`CompletionClient`] against any OpenAI-compatible
//! `chat/completions` endpoint. Credentials, base URL, model, token limit and timeout come
//! from [`util::config`] unless supplied explicitly through [`OpenAiClient::new`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use util::config;

use crate::error::MarkerError;
use crate::parsers::completion_parser::CompletionParser;
use crate::traits::completion::{CompletionClient, CompletionRequest};
use crate::traits::parser::Parser;

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiClient {
    /// Builds a client from the global configuration.
    ///
    /// # Errors
    /// [`MarkerError::MissingApiKey`] when `OPENAI_API_KEY` is empty.
    pub fn from_config() -> Result<Self, MarkerError> {
        Self::new(
            config::openai_api_key(),
            config::openai_base_url(),
            config::ai_model(),
            config::ai_max_tokens(),
            Duration::from_secs(config::ai_request_timeout_secs()),
        )
    }

    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, MarkerError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(MarkerError::MissingApiKey);
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, MarkerError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(model = %self.model, temperature = request.temperature, "sending chat completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(MarkerError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        CompletionParser.parse(&text)
    }
}
