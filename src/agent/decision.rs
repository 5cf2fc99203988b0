//! Decision Decoding
//!
//! Turns the reasoning step's raw model text into a closed decision variant.
//! Two sentinels exist alongside tool names: `no_action` (skip acting this
//! iteration) and `generate_final_html` (end the research loop). A response
//! that cannot be decoded degrades to a skip, never an error.

use serde::Deserialize;
use serde_json::Value;

use relief_forge_core::{tool_names, ToolOutput};
use relief_forge_llm::parse_json_value;

/// Sentinel the model uses to skip acting this iteration.
pub const NO_ACTION: &str = "no_action";
/// Sentinel the model uses to end the research loop.
pub const GENERATE_FINAL_HTML: &str = "generate_final_html";

/// One decoded decision from the reasoning step.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Execute a tool with the given parameters
    Act {
        tool: String,
        parameters: Value,
        reasoning: String,
    },
    /// Do nothing this iteration
    Skip { reasoning: String },
    /// End the loop and move to generation
    Finish { reasoning: String },
}

impl Decision {
    /// Build a skip decision.
    pub fn skip(reasoning: impl Into<String>) -> Self {
        Decision::Skip {
            reasoning: reasoning.into(),
        }
    }

    /// Build a finish decision.
    pub fn finish(reasoning: impl Into<String>) -> Self {
        Decision::Finish {
            reasoning: reasoning.into(),
        }
    }

    /// The model's stated reasoning.
    pub fn reasoning(&self) -> &str {
        match self {
            Decision::Act { reasoning, .. }
            | Decision::Skip { reasoning }
            | Decision::Finish { reasoning } => reasoning,
        }
    }

    /// The action name as recorded in the session context.
    pub fn action_name(&self) -> &str {
        match self {
            Decision::Act { tool, .. } => tool,
            Decision::Skip { .. } => NO_ACTION,
            Decision::Finish { .. } => GENERATE_FINAL_HTML,
        }
    }
}

/// The raw shape the reasoning prompt asks for.
#[derive(Debug, Deserialize)]
struct RawDecision {
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    action: String,
    #[serde(default)]
    parameters: Value,
}

/// Decode a reasoning response into a decision.
///
/// Fail-soft: unparseable text or an unexpected shape becomes a skip with
/// the parse failure as its reasoning, so one bad response costs one
/// iteration rather than the execution.
pub fn decode_decision(raw_text: &str) -> Decision {
    let value = match parse_json_value(raw_text) {
        Ok(v) => v,
        Err(e) => return Decision::skip(format!("JSON parsing failed: {}", e)),
    };

    let raw: RawDecision = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => return Decision::skip(format!("Decision had unexpected shape: {}", e)),
    };

    match raw.action.as_str() {
        GENERATE_FINAL_HTML => Decision::finish(raw.reasoning),
        NO_ACTION | "" => Decision::skip(raw.reasoning),
        tool => Decision::Act {
            tool: tool.to_string(),
            parameters: raw.parameters,
            reasoning: raw.reasoning,
        },
    }
}

/// Normalize tool parameters into an object.
///
/// A bare string aimed at the search tool is wrapped as its query; any
/// other non-object shape is rejected with a structured failure the loop
/// records like a tool result.
pub fn normalize_parameters(tool: &str, parameters: Value) -> Result<Value, ToolOutput> {
    match parameters {
        Value::Object(_) => Ok(parameters),
        Value::Null => Ok(serde_json::json!({})),
        Value::String(s) => {
            if tool == tool_names::WEB_SEARCH {
                Ok(serde_json::json!({ "query": s }))
            } else {
                Err(ToolOutput::err(
                    "Invalid parameters format: expected object, got string",
                )
                .with("tool", tool)
                .with("raw_parameters", s))
            }
        }
        other => Err(ToolOutput::err(format!(
            "Invalid parameters format: expected object, got {}",
            json_type_name(&other)
        ))
        .with("tool", tool)
        .with("raw_parameters", other.to_string())),
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
