//! Wire format of the `/chat/completions` endpoint.

use crate::routing::domain::{ChatMessage, CompletionRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct ChatCompletionBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl<'a> ChatCompletionBody<'a> {
    pub(super) fn new(model: &'a str, request: &'a CompletionRequest) -> Self {
        Self {
            model,
            messages: request.messages(),
            temperature: request.temperature(),
            max_tokens: request.max_tokens(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}
