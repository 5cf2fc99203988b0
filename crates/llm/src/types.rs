//! LLM Types
//!
//! Error taxonomy, provider configuration, and the completion request shape
//! shared by every model client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a model client can surface.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Missing or rejected credentials
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The request was malformed
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// The requested model does not exist
    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    /// Provider-side rate limiting
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// Provider-side failure
    #[error("Server error ({status:?}): {message}")]
    ServerError { message: String, status: Option<u16> },

    /// The call exceeded its deadline
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// Transport-level failure
    #[error("Network error: {message}")]
    Network { message: String },

    /// The response text could not be decoded into the expected structure
    #[error("Malformed model response: {message}")]
    MalformedResponse { message: String },

    /// Anything else
    #[error("{message}")]
    Other { message: String },
}

/// Result type alias for model client operations.
pub type LlmResult<T> = Result<T, LlmError>;

impl LlmError {
    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }
}

/// Configuration for one model client, read once at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key, absent for keyless local providers
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier (e.g. "gpt-4o-mini")
    pub model: String,
    /// Override for the provider's default endpoint
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    120
}

impl ProviderConfig {
    /// Create a config for the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the endpoint override.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}

/// One completion request: a system instruction, a user instruction, and
/// sampling limits. The response is raw text expected to contain a JSON
/// object, possibly wrapped in markdown fences.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction
    pub system: String,
    /// User instruction
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Token ceiling for the response
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request.
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
            max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_builder() {
        let config = ProviderConfig::new("gpt-4o-mini")
            .with_api_key("sk-test")
            .with_base_url("http://localhost:8080/v1/chat/completions");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_provider_config_deserializes_with_defaults() {
        let config: ProviderConfig = serde_json::from_str(r#"{"model": "gpt-4o-mini"}"#).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_error_display() {
        let err = LlmError::Timeout {
            message: "deadline exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "Request timed out: deadline exceeded");
    }
}
