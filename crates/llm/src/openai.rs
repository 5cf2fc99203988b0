//! OpenAI Client
//!
//! Implementation of the `LlmClient` trait over OpenAI's chat completions
//! API. Every loop phase maps to one system+user exchange with its own
//! temperature and token ceiling.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::http_client::build_http_client;
use crate::provider::{missing_api_key_error, parse_http_error, LlmClient};
use crate::types::{CompletionRequest, LlmError, LlmResult, ProviderConfig};

/// Default OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI chat completions client
pub struct OpenAiClient {
    config: ProviderConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ProviderConfig) -> Self {
        let client = build_http_client(Duration::from_secs(config.timeout_secs));
        Self { config, client }
    }

    /// The API endpoint, honoring any configured override.
    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(OPENAI_API_URL)
    }

    /// Build the request body for the API.
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user }
            ],
        })
    }

    fn map_transport_error(err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout {
                message: err.to_string(),
            }
        } else {
            LlmError::Network {
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| missing_api_key_error(self.name()))?;

        tracing::debug!(
            model = %self.config.model,
            max_tokens = request.max_tokens,
            "sending completion request"
        );

        let response = self
            .client
            .post(self.base_url())
            .bearer_auth(api_key)
            .json(&self.build_request_body(request))
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status.as_u16(), &body, self.name()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::malformed(format!("invalid completion payload: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::malformed("completion had no message content"))?;

        Ok(content.trim().to_string())
    }

    async fn health_check(&self) -> LlmResult<()> {
        let probe = CompletionRequest::new("You are a health probe.", "Reply with OK.", 0.0, 8);
        self.complete(&probe).await.map(|_| ())
    }
}
