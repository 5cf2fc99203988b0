//! Agent Configuration
//!
//! Named numeric/boolean tunables for one agent execution, read once at
//! construction. Budgets are explicit configuration rather than constants so
//! the budget/quality tradeoff is tunable per deployment.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Tunables governing a single REACT execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum reason/act iterations per execution
    pub max_iterations: u32,
    /// Maximum language model calls per execution (planning + reasoning + generation + URL fix)
    pub max_llm_calls: u32,
    /// Token ceiling for the planning call
    pub planning_max_tokens: u32,
    /// Token ceiling for each reasoning call
    pub reasoning_max_tokens: u32,
    /// Token ceiling for the generation, repair, and URL-fix calls
    pub generation_max_tokens: u32,
    /// Timeout in seconds for every outbound research tool request
    pub tool_timeout_secs: u64,
    /// Whether the web search tool is registered
    pub enable_web_search: bool,
    /// Whether the API endpoint validation tool is registered
    pub enable_endpoint_validation: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            max_llm_calls: 12,
            planning_max_tokens: 2000,
            reasoning_max_tokens: 2000,
            generation_max_tokens: 6000,
            tool_timeout_secs: 30,
            enable_web_search: true,
            enable_endpoint_validation: true,
        }
    }
}

impl AgentConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the language model call budget.
    pub fn with_max_llm_calls(mut self, max: u32) -> Self {
        self.max_llm_calls = max;
        self
    }

    /// Set the tool request timeout.
    pub fn with_tool_timeout_secs(mut self, secs: u64) -> Self {
        self.tool_timeout_secs = secs;
        self
    }

    /// Enable or disable the web search tool.
    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.enable_web_search = enabled;
        self
    }

    /// Enable or disable the endpoint validation tool.
    pub fn with_endpoint_validation(mut self, enabled: bool) -> Self {
        self.enable_endpoint_validation = enabled;
        self
    }

    /// Check the config for values that would make an execution degenerate.
    ///
    /// The loop reserves one model call for generation, so the call budget
    /// must cover at least planning + generation.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_iterations == 0 {
            return Err(CoreError::config("max_iterations must be at least 1"));
        }
        if self.max_llm_calls < 2 {
            return Err(CoreError::config(
                "max_llm_calls must be at least 2 (planning + generation)",
            ));
        }
        if self.tool_timeout_secs == 0 {
            return Err(CoreError::config("tool_timeout_secs must be nonzero"));
        }
        Ok(())
    }
}
