//! Shared test doubles: a scripted model client and static research tools.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use relief_forge::core::{tool_names, ResearchTool, ToolOutput, ToolRegistry};
use relief_forge::llm::{CompletionRequest, LlmClient, LlmError, LlmResult};

/// Model client that replays a fixed sequence of responses. When the script
/// runs out, the last response repeats; an empty script always errors.
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
    last: Mutex<Option<String>>,
    calls: AtomicU32,
    fail_after: Option<u32>,
}

impl ScriptedLlm {
    pub fn new<S: Into<String>>(responses: Vec<S>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            last: Mutex::new(None),
            calls: AtomicU32::new(0),
            fail_after: None,
        }
    }

    /// Fail every call after the first `n` with a timeout.
    pub fn with_failure_after(mut self, n: u32) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-test"
    }

    async fn complete(&self, _request: &CompletionRequest) -> LlmResult<String> {
        let made = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after {
            if made >= limit {
                return Err(LlmError::Timeout {
                    message: "scripted timeout".to_string(),
                });
            }
        }

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(response) => {
                *self.last.lock().unwrap() = Some(response.clone());
                Ok(response)
            }
            None => match self.last.lock().unwrap().clone() {
                Some(response) => Ok(response),
                None => Err(LlmError::Other {
                    message: "script exhausted".to_string(),
                }),
            },
        }
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }
}

/// Research tool that always returns a fixed output.
pub struct StaticTool {
    name: String,
    output: ToolOutput,
}

impl StaticTool {
    pub fn new(name: &str, output: ToolOutput) -> Self {
        Self {
            name: name.to_string(),
            output,
        }
    }
}

#[async_trait]
impl ResearchTool for StaticTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Static test tool"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({})
    }

    async fn execute(&self, _parameters: &Value) -> ToolOutput {
        self.output.clone()
    }
}

/// Registry of static tools: a succeeding search, a succeeding STAC fetch,
/// and an HTML endpoint validator reporting the given invalid URLs.
pub fn static_registry(invalid_urls: Value) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(StaticTool::new(
        tool_names::WEB_SEARCH,
        ToolOutput::ok()
            .with("query", "scripted")
            .with("results", serde_json::json!([]))
            .with("total_found", 0),
    )));
    registry.register(Arc::new(StaticTool::new(
        tool_names::FETCH_STAC_SAMPLE_DATA,
        ToolOutput::ok()
            .with("collection", "gdacs-events")
            .with("search_url", "https://catalog.example.org/stac/search")
            .with("total_found", 2)
            .with("sample_features", serde_json::json!([]))
            .with("available_properties", serde_json::json!(["title"])),
    )));

    let has_invalid = invalid_urls.as_array().map(|a| !a.is_empty()).unwrap_or(false);
    registry.register(Arc::new(StaticTool::new(
        tool_names::VALIDATE_HTML_ENDPOINTS,
        ToolOutput::ok()
            .with("urls_found", if has_invalid { 1 } else { 0 })
            .with("valid_urls", serde_json::json!([]))
            .with("invalid_urls", invalid_urls),
    )));
    registry
}

/// A plan response the planning phase accepts.
pub fn plan_json() -> String {
    serde_json::json!({
        "summary": "Build a flood dashboard",
        "user_intent": "Track flooding in Dhaka",
        "functional_requirements": ["Show flood events on a map"],
        "data_requirements": ["gdacs-events collection"],
        "ui_components": ["interactive map"],
        "research_tasks": ["Fetch sample flood events"],
        "success_criteria": ["Map renders real events"]
    })
    .to_string()
}

/// A reasoning response choosing a tool.
pub fn act_json(tool: &str) -> String {
    serde_json::json!({
        "reasoning": format!("run {}", tool),
        "action": tool,
        "parameters": {},
        "continue": true
    })
    .to_string()
}

/// A reasoning response choosing the no-op sentinel.
pub fn no_action_json() -> String {
    serde_json::json!({
        "reasoning": "still thinking",
        "action": "no_action",
        "continue": true
    })
    .to_string()
}

/// A reasoning response choosing to finish research.
pub fn finish_json() -> String {
    serde_json::json!({
        "reasoning": "research complete",
        "action": "generate_final_html",
        "continue": false
    })
    .to_string()
}

/// Generated content that validates clean.
pub fn clean_content_json() -> String {
    serde_json::json!({
        "title": "Dhaka Flood Monitor",
        "description": "Live flood tracking for Dhaka",
        "main_content": "<div id=\"map\"></div>",
        "custom_css": "#map { height: 400px; }",
        "custom_js": "const map = L.map('map');"
    })
    .to_string()
}

/// Generated content with a structure issue (map element missing).
pub fn broken_content_json() -> String {
    serde_json::json!({
        "title": "Dhaka Flood Monitor",
        "description": "Live flood tracking for Dhaka",
        "main_content": "<p>loading</p>",
        "custom_css": "",
        "custom_js": "const map = L.map('ghostMap');"
    })
    .to_string()
}
