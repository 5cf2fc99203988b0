//! LLM Client Trait
//!
//! Defines the single-call interface the orchestration loop consumes. The
//! loop never streams and never hands tools to the provider; every phase is
//! one blocking completion whose raw text is decoded by the caller.

use async_trait::async_trait;

use crate::types::{CompletionRequest, LlmError, LlmResult};

/// Trait every model client implements.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name for identification.
    fn name(&self) -> &'static str;

    /// The model being used.
    fn model(&self) -> &str;

    /// Run one completion and return the raw response text.
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String>;

    /// Check that the provider is reachable and the credentials work.
    async fn health_check(&self) -> LlmResult<()>;
}

/// Helper for a missing API key.
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Map an HTTP error status to the client error taxonomy.
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}
