//! Chat-completion envelope parser.
//!
//! Extracts `choices[0].message.content` from an OpenAI-compatible response body.

use serde::Deserialize;

use crate::error::MarkerError;
use crate::traits::parser::Parser;

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Parses a raw response body into the assistant's message text.
pub struct CompletionParser;

impl<'a> Parser<&'a str, String> for CompletionParser {
    fn parse(&self, body: &'a str) -> Result<String, MarkerError> {
        let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
            MarkerError::InvalidJson(format!(
                "error decoding completion body: {e}. Full response: {body}"
            ))
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(MarkerError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_first_choice_content() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Grade: 7 out of 10" } },
                { "index": 1, "message": { "role": "assistant", "content": "ignored" } }
            ],
            "usage": { "total_tokens": 42 }
        }"#;
        assert_eq!(CompletionParser.parse(body).unwrap(), "Grade: 7 out of 10");
    }

    #[test]
    fn test_no_choices_is_empty_completion() {
        let err = CompletionParser.parse(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, MarkerError::EmptyCompletion));
    }

    #[test]
    fn test_null_or_blank_content_is_empty_completion() {
        let null = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let blank = r#"{"choices": [{"message": {"role": "assistant", "content": "   "}}]}"#;
        assert!(matches!(CompletionParser.parse(null), Err(MarkerError::EmptyCompletion)));
        assert!(matches!(CompletionParser.parse(blank), Err(MarkerError::EmptyCompletion)));
    }

    #[test]
    fn test_malformed_body_is_invalid_json() {
        let err = CompletionParser.parse("<html>Bad Gateway</html>").unwrap_err();
        match err {
            MarkerError::InvalidJson(msg) => assert!(msg.contains("Bad Gateway")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
