//! Research Tool Abstraction
//!
//! Defines the uniform capability interface every research tool exposes and
//! the registry the control loop dispatches through:
//!
//! - `ToolOutput` - structured result data; failures are encoded here, never
//!   raised past the tool boundary
//! - `ResearchTool` - identity, schema, and execution
//! - `ToolRegistry` - name lookup with ordered iteration
//!
//! Unknown tool names resolve to a failed `ToolOutput` rather than an error:
//! a model asking for a tool that does not exist is a recoverable
//! per-iteration condition, not a reason to abort the execution.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Well-known tool names shared between the registry and the control loop.
pub mod names {
    /// Web search tool
    pub const WEB_SEARCH: &str = "web_search";
    /// API endpoint validator
    pub const VALIDATE_API_ENDPOINT: &str = "validate_api_endpoint";
    /// STAC catalog sample fetch
    pub const FETCH_STAC_SAMPLE_DATA: &str = "fetch_stac_sample_data";
    /// HTML endpoint extraction and validation
    pub const VALIDATE_HTML_ENDPOINTS: &str = "validate_html_endpoints";
}

// ============================================================================
// ToolOutput
// ============================================================================

/// Result of one tool execution.
///
/// Created by a tool, appended to the session context by the loop, and
/// never mutated afterwards. Tool-specific fields live in `data` and
/// serialize flattened alongside `success`/`error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Whether the execution was successful
    pub success: bool,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Tool-specific result fields
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ToolOutput {
    /// Create a successful result.
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: Map::new(),
        }
    }

    /// Create a failed result.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: Map::new(),
        }
    }

    /// Attach a result field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Read a result field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Read a string result field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// Serialize to a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// ============================================================================
// ResearchTool Trait
// ============================================================================

/// A research capability the control loop can dispatch.
///
/// `execute` must never fail past its boundary: internal failures (network,
/// timeouts, malformed responses) are caught and returned as
/// `ToolOutput { success: false, error: Some(..) }` so the loop can feed
/// them back into context.
#[async_trait]
pub trait ResearchTool: Send + Sync {
    /// Stable identifier the model uses to select this tool.
    fn name(&self) -> &str;

    /// Natural-language description consumed by the reasoning prompt.
    fn description(&self) -> &str;

    /// JSON schema of accepted parameters (names, types, constraints).
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given parameters.
    async fn execute(&self, parameters: &Value) -> ToolOutput;
}

// ============================================================================
// ToolRegistry
// ============================================================================

/// Name-to-tool lookup table populated at startup.
///
/// Registration order is preserved so prompt listings and definitions are
/// deterministic across runs.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ResearchTool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn ResearchTool>) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ResearchTool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool definitions as JSON values in registration order.
    pub fn definitions(&self) -> Vec<Value> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.parameters_schema(),
                })
            })
            .collect()
    }

    /// One-line-per-tool listing for the reasoning prompt.
    pub fn catalog_text(&self) -> String {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| format!("- {}: {}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Execute a tool by name.
    ///
    /// An unknown name yields a failed output, not an error: the loop treats
    /// it as a recoverable per-iteration condition.
    pub async fn execute(&self, name: &str, parameters: &Value) -> ToolOutput {
        match self.tools.get(name) {
            Some(tool) => tool.execute(parameters).await,
            None => ToolOutput::err(format!("Tool '{}' not found", name)),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
