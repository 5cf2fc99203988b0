//! Relief Forge LLM
//!
//! Language model client abstraction for the orchestration loop:
//!
//! - `provider` - the `LlmClient` trait (one completion call, raw text back)
//! - `openai` - OpenAI chat completions implementation
//! - `http_client` - HTTP client factory with timeout discipline
//! - `decode` - fence stripping and bounded JSON escape repair for model output
//! - `types` - error taxonomy, provider config, completion request

pub mod decode;
pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use decode::{parse_json_response, parse_json_value, repair_json_escapes, strip_code_fences};
pub use http_client::build_http_client;
pub use openai::OpenAiClient;
pub use provider::{missing_api_key_error, parse_http_error, LlmClient};
pub use types::{CompletionRequest, LlmError, LlmResult, ProviderConfig};
