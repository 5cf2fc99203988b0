//! Session Context
//!
//! The knowledge a single execution accumulates: the user request, the
//! implementation plan, every tool invocation with its observed result, and
//! every reasoning step. Tool results and reasoning steps are append-only
//! within one execution; the ready flag transitions false to true exactly
//! once and halts the loop.
//!
//! Each execution owns its context by value. Nothing here is shared across
//! concurrent executions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tool::{names, ToolOutput};

/// Structured plan produced once by the planning phase.
///
/// Immutable once stored; every subsequent reasoning call reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImplementationPlan {
    /// Brief summary of what will be built
    pub summary: String,
    /// Clear interpretation of what the user wants
    pub user_intent: String,
    /// Specific functional requirements
    pub functional_requirements: Vec<String>,
    /// Data sources needed
    pub data_requirements: Vec<String>,
    /// UI components to include
    pub ui_components: Vec<String>,
    /// Research tasks to complete before generation
    pub research_tasks: Vec<String>,
    /// Criteria for a successful implementation
    pub success_criteria: Vec<String>,
}

/// The decision that triggered a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The model's stated reasoning for the action
    pub reasoning: String,
    /// Tool name that was executed
    pub action: String,
    /// Parameters passed to the tool
    pub parameters: Value,
}

/// One tool invocation and its observed result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRecord {
    /// Loop iteration the invocation happened in
    pub iteration: u32,
    /// The decision that triggered it
    pub action: ActionRecord,
    /// The tool's result, never mutated after creation
    pub result: ToolOutput,
    /// When the result was recorded
    pub timestamp: DateTime<Utc>,
}

/// One reasoning step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningRecord {
    /// Loop iteration the step happened in
    pub iteration: u32,
    /// The model's reasoning text
    pub reasoning: String,
    /// The action the step decided on (tool name or sentinel)
    pub action: String,
    /// When the step was recorded
    pub timestamp: DateTime<Utc>,
}

/// Mutable, JSON-serializable state accumulated across one execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// The natural-language request being fulfilled
    pub user_request: String,
    /// Rendered reference describing the configured data sources
    pub data_sources_reference: String,
    /// Rendered reference describing the available page templates
    pub templates_reference: String,
    /// The plan, absent until the planning phase completes
    pub implementation_plan: Option<ImplementationPlan>,
    tool_results: Vec<ToolRecord>,
    reasoning_steps: Vec<ReasoningRecord>,
    ready_to_generate: bool,
}

impl SessionContext {
    /// Create a fresh context for one execution.
    pub fn new(
        user_request: impl Into<String>,
        data_sources_reference: impl Into<String>,
        templates_reference: impl Into<String>,
    ) -> Self {
        Self {
            user_request: user_request.into(),
            data_sources_reference: data_sources_reference.into(),
            templates_reference: templates_reference.into(),
            implementation_plan: None,
            tool_results: Vec::new(),
            reasoning_steps: Vec::new(),
            ready_to_generate: false,
        }
    }

    /// Store the implementation plan. The first plan wins; later calls are
    /// ignored so the plan stays immutable once created.
    pub fn set_plan(&mut self, plan: ImplementationPlan) {
        if self.implementation_plan.is_none() {
            self.implementation_plan = Some(plan);
        }
    }

    /// Append a tool invocation record.
    pub fn record_tool_result(&mut self, iteration: u32, action: ActionRecord, result: ToolOutput) {
        self.tool_results.push(ToolRecord {
            iteration,
            action,
            result,
            timestamp: Utc::now(),
        });
    }

    /// Append a reasoning step record.
    pub fn record_reasoning(
        &mut self,
        iteration: u32,
        reasoning: impl Into<String>,
        action: impl Into<String>,
    ) {
        self.reasoning_steps.push(ReasoningRecord {
            iteration,
            reasoning: reasoning.into(),
            action: action.into(),
            timestamp: Utc::now(),
        });
    }

    /// All tool records, in invocation order.
    pub fn tool_results(&self) -> &[ToolRecord] {
        &self.tool_results
    }

    /// The last `n` tool records, in invocation order.
    pub fn recent_tool_results(&self, n: usize) -> &[ToolRecord] {
        let start = self.tool_results.len().saturating_sub(n);
        &self.tool_results[start..]
    }

    /// All reasoning records, in order.
    pub fn reasoning_steps(&self) -> &[ReasoningRecord] {
        &self.reasoning_steps
    }

    /// Number of tool invocations that succeeded.
    pub fn successful_tool_calls(&self) -> usize {
        self.tool_results.iter().filter(|r| r.result.success).count()
    }

    /// Number of successful invocations of a specific tool.
    pub fn successful_calls_to(&self, tool_name: &str) -> usize {
        self.tool_results
            .iter()
            .filter(|r| r.action.action == tool_name && r.result.success)
            .count()
    }

    /// Number of successful sample fetches from the configured catalog.
    pub fn successful_stac_fetches(&self) -> usize {
        self.successful_calls_to(names::FETCH_STAC_SAMPLE_DATA)
    }

    /// Whether the loop has decided to move to generation.
    pub fn ready_to_generate(&self) -> bool {
        self.ready_to_generate
    }

    /// Transition to the ready state. Idempotent; the flag never goes back.
    pub fn mark_ready(&mut self) {
        self.ready_to_generate = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(tool: &str) -> ActionRecord {
        ActionRecord {
            reasoning: "need data".to_string(),
            action: tool.to_string(),
            parameters: serde_json::json!({}),
        }
    }

    fn context() -> SessionContext {
        SessionContext::new("flood map for Dhaka", "sources", "templates")
    }

    #[test]
    fn test_new_context_is_empty() {
        let ctx = context();
        assert!(ctx.implementation_plan.is_none());
        assert!(ctx.tool_results().is_empty());
        assert!(ctx.reasoning_steps().is_empty());
        assert!(!ctx.ready_to_generate());
    }

    #[test]
    fn test_first_plan_wins() {
        let mut ctx = context();
        ctx.set_plan(ImplementationPlan {
            summary: "first".to_string(),
            ..Default::default()
        });
        ctx.set_plan(ImplementationPlan {
            summary: "second".to_string(),
            ..Default::default()
        });
        assert_eq!(ctx.implementation_plan.as_ref().unwrap().summary, "first");
    }

    #[test]
    fn test_records_only_grow() {
        let mut ctx = context();
        ctx.record_tool_result(1, action(names::WEB_SEARCH), ToolOutput::ok());
        ctx.record_tool_result(2, action(names::WEB_SEARCH), ToolOutput::err("down"));
        ctx.record_reasoning(1, "searching", names::WEB_SEARCH);

        assert_eq!(ctx.tool_results().len(), 2);
        assert_eq!(ctx.reasoning_steps().len(), 1);
        assert_eq!(ctx.successful_tool_calls(), 1);
    }

    #[test]
    fn test_successful_calls_are_counted_per_tool() {
        let mut ctx = context();
        ctx.record_tool_result(1, action(names::WEB_SEARCH), ToolOutput::ok());
        ctx.record_tool_result(2, action(names::FETCH_STAC_SAMPLE_DATA), ToolOutput::ok());
        ctx.record_tool_result(3, action(names::FETCH_STAC_SAMPLE_DATA), ToolOutput::err("404"));

        assert_eq!(ctx.successful_tool_calls(), 2);
        assert_eq!(ctx.successful_stac_fetches(), 1);
        assert_eq!(ctx.successful_calls_to(names::WEB_SEARCH), 1);
    }

    #[test]
    fn test_recent_tool_results_returns_tail() {
        let mut ctx = context();
        for i in 1..=5 {
            ctx.record_tool_result(i, action(names::WEB_SEARCH), ToolOutput::ok());
        }
        let recent = ctx.recent_tool_results(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].iteration, 3);
        assert_eq!(recent[2].iteration, 5);

        assert_eq!(ctx.recent_tool_results(10).len(), 5);
    }

    #[test]
    fn test_mark_ready_is_one_way() {
        let mut ctx = context();
        ctx.mark_ready();
        assert!(ctx.ready_to_generate());
        ctx.mark_ready();
        assert!(ctx.ready_to_generate());
    }

    #[test]
    fn test_context_serializes() {
        let mut ctx = context();
        ctx.record_tool_result(1, action(names::WEB_SEARCH), ToolOutput::ok());
        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(value["user_request"], "flood map for Dhaka");
        assert_eq!(value["tool_results"][0]["iteration"], 1);
    }

    #[test]
    fn test_plan_deserializes_with_missing_fields() {
        let plan: ImplementationPlan =
            serde_json::from_str(r#"{"summary": "flood dashboard"}"#).unwrap();
        assert_eq!(plan.summary, "flood dashboard");
        assert!(plan.research_tasks.is_empty());
    }
}
