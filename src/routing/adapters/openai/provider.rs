//! `reqwest` client for OpenAI-compatible chat-completion endpoints.

use super::wire::{ChatCompletionBody, ChatCompletionResponse};
use crate::routing::{
    domain::{Completion, CompletionRequest, ProviderError, ProviderErrorKind},
    ports::CompletionProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Time budget for one completion request unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Completion provider speaking the OpenAI `/chat/completions` protocol.
///
/// HTTP 401 and 403 classify as authentication failures, 429 as rate
/// limiting, and 5xx as server failures. Transport errors, including
/// timeouts, and undecodable responses classify as other failures.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleProvider {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiCompatibleProvider {
    /// Creates a provider for the API rooted at `base_url`, such as
    /// `http://127.0.0.1:8317/v1`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the per-request time budget.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn transport_error(err: &reqwest::Error) -> ProviderError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        format!("transport failure: {err}")
    };
    ProviderError::new(ProviderErrorKind::Other, message)
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    async fn complete(
        &self,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, ProviderError> {
        debug!(model, endpoint = %self.endpoint(), "sending chat completion");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&ChatCompletionBody::new(model, request))
            .send()
            .await
            .map_err(|err| transport_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), &body));
        }

        let decoded: ChatCompletionResponse = response.json().await.map_err(|err| {
            ProviderError::new(
                ProviderErrorKind::Other,
                format!("undecodable completion response: {err}"),
            )
        })?;
        let content = decoded
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::Other, "completion had no content")
            })?;

        Ok(Completion {
            model: model.to_owned(),
            content,
        })
    }
}
