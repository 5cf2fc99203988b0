//! API Endpoint Validator
//!
//! Probes an API endpoint and reports its status, accessibility, content
//! type, and a depth-limited summary of JSON payloads so the reasoning step
//! can judge whether the data shape fits the plan.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use relief_forge_core::{ResearchTool, ToolOutput};
use relief_forge_llm::build_http_client;

/// The `validate_api_endpoint` research tool.
pub struct EndpointValidatorTool {
    client: reqwest::Client,
}

impl EndpointValidatorTool {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_http_client(timeout),
        }
    }
}

#[async_trait]
impl ResearchTool for EndpointValidatorTool {
    fn name(&self) -> &str {
        relief_forge_core::tool_names::VALIDATE_API_ENDPOINT
    }

    fn description(&self) -> &str {
        "Validate an API endpoint and check its status, response format, and data availability."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "url": {
                "type": "string",
                "description": "API endpoint URL to validate"
            },
            "method": {
                "type": "string",
                "description": "HTTP method (default: GET)",
                "enum": ["GET", "POST"]
            }
        })
    }

    async fn execute(&self, parameters: &Value) -> ToolOutput {
        let url = match parameters.get("url").and_then(|v| v.as_str()) {
            Some(u) => u.to_string(),
            None => return ToolOutput::err("Missing required parameter: url"),
        };
        let method = parameters
            .get("method")
            .and_then(|v| v.as_str())
            .unwrap_or("GET")
            .to_uppercase();

        let request = match method.as_str() {
            "GET" => self.client.get(&url),
            "POST" => self.client.post(&url),
            other => {
                return ToolOutput::err(format!("Unsupported method: {}", other)).with("url", url)
            }
        };

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_lowercase();
                let body = response.bytes().await.unwrap_or_default();
                interpret_response(&url, status, &content_type, &body)
            }
            Err(err) if err.is_timeout() => ToolOutput::err("Request timeout")
                .with("url", url)
                .with("is_accessible", false),
            Err(err) => ToolOutput::err(err.to_string())
                .with("url", url)
                .with("is_accessible", false),
        }
    }
}

/// Turn a raw HTTP response into the tool's report.
///
/// Separated from the network call so response interpretation is testable
/// without a live endpoint.
pub fn interpret_response(url: &str, status: u16, content_type: &str, body: &[u8]) -> ToolOutput {
    let is_json = content_type.contains("application/json");
    let is_accessible = status < 400;

    let mut output = ToolOutput::ok()
        .with("url", url)
        .with("status_code", status)
        .with("is_accessible", is_accessible)
        .with("content_type", content_type)
        .with("is_json", is_json)
        .with("response_size", body.len());

    if is_json && is_accessible {
        match serde_json::from_slice::<Value>(body) {
            Ok(data) => {
                output = output.with("sample_structure", analyze_json_structure(&data, 2));
            }
            Err(_) => {
                output = output.with("json_parse_error", true);
            }
        }
    }

    output
}

/// Summarize a JSON value's shape for the model.
///
/// Objects report up to 10 keys and recurse into the first 3 values; arrays
/// report their length plus one sample item; recursion stops at `max_depth`.
pub fn analyze_json_structure(data: &Value, max_depth: u32) -> Value {
    if max_depth == 0 {
        return serde_json::json!({ "type": json_type_name(data) });
    }

    match data {
        Value::Object(map) => {
            let keys: Vec<&String> = map.keys().take(10).collect();
            let sample_values: serde_json::Map<String, Value> = map
                .iter()
                .take(3)
                .map(|(k, v)| (k.clone(), analyze_json_structure(v, max_depth - 1)))
                .collect();
            serde_json::json!({
                "type": "object",
                "keys": keys,
                "sample_values": sample_values,
            })
        }
        Value::Array(items) => serde_json::json!({
            "type": "array",
            "length": items.len(),
            "sample_item": items.first().map(|item| analyze_json_structure(item, max_depth - 1)),
        }),
        other => {
            let sample: String = other.to_string().chars().take(50).collect();
            serde_json::json!({ "type": json_type_name(other), "sample": sample })
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
