//! REACT Loop Integration Tests
//!
//! Exercise the full loop against a scripted model and static tools:
//! budget invariants, generation guardrails, the happy path, URL fixing,
//! and the failure paths.

use std::sync::Arc;

use relief_forge::core::{AgentConfig, SourceCatalog, TemplateCatalog, ToolRegistry};
use relief_forge::{MemorySessionLog, MessageKind, ReactAgent};

use crate::support::{
    act_json, broken_content_json, clean_content_json, finish_json, no_action_json, plan_json,
    static_registry, ScriptedLlm,
};

fn make_agent(
    config: AgentConfig,
    llm: Arc<ScriptedLlm>,
    registry: ToolRegistry,
    log: Arc<MemorySessionLog>,
) -> ReactAgent {
    ReactAgent::new(
        config,
        llm,
        registry,
        &SourceCatalog::default(),
        &TemplateCatalog::default(),
        log,
    )
}

fn agent_messages(log: &MemorySessionLog) -> Vec<String> {
    log.entries_of_kind(MessageKind::Agent)
        .into_iter()
        .map(|e| e.content)
        .collect()
}

// ============================================================================
// Happy Path
// ============================================================================

#[tokio::test]
async fn test_full_execution_with_research() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        plan_json(),
        act_json("web_search"),
        act_json("fetch_stac_sample_data"),
        finish_json(),
        clean_content_json(),
    ]));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(
        AgentConfig::default(),
        Arc::clone(&llm),
        static_registry(serde_json::json!([])),
        Arc::clone(&log),
    );

    let report = agent.execute("flood map for Dhaka").await;

    assert!(report.success);
    assert!(report.error.is_none());
    assert_eq!(report.iterations_completed, 3);
    assert_eq!(report.llm_calls_made, 5);
    assert_eq!(report.intelligence_used, 2);
    assert!(report.context.ready_to_generate());

    let content = report.html_content.unwrap();
    assert_eq!(content.title, "Dhaka Flood Monitor");

    let validation = report.html_validation.unwrap();
    assert!(!validation.content_fixed);
    assert_eq!(validation.message, "Content passed all validations");

    let url_validation = report.url_validation.unwrap();
    assert_eq!(url_validation["urls_found"], 0);
}

#[tokio::test]
async fn test_report_serializes_with_context() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        plan_json(),
        act_json("web_search"),
        act_json("fetch_stac_sample_data"),
        finish_json(),
        clean_content_json(),
    ]));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(
        AgentConfig::default(),
        llm,
        static_registry(serde_json::json!([])),
        log,
    );

    let report = agent.execute("flood map").await;
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["context"]["user_request"], "flood map");
    assert_eq!(value["context"]["tool_results"].as_array().unwrap().len(), 2);
    assert!(value["html_content"]["title"].is_string());
}

// ============================================================================
// Budget Invariants
// ============================================================================

#[tokio::test]
async fn test_iteration_budget_holds_at_termination() {
    let config = AgentConfig::default()
        .with_max_iterations(4)
        .with_max_llm_calls(20);
    let llm = Arc::new(ScriptedLlm::new(vec![plan_json(), no_action_json()]));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(config, llm, static_registry(serde_json::json!([])), log);

    let report = agent.execute("flood map").await;

    assert_eq!(report.iterations_completed, 4);
    assert!(report.iterations_completed <= 4);
    assert!(report.llm_calls_made <= 20);
    // Planning + 4 reasoning steps + generation
    assert_eq!(report.llm_calls_made, 6);
}

#[tokio::test]
async fn test_llm_call_budget_holds_at_termination() {
    let config = AgentConfig::default()
        .with_max_iterations(100)
        .with_max_llm_calls(4);
    let llm = Arc::new(ScriptedLlm::new(vec![plan_json(), no_action_json()]));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(config, llm, static_registry(serde_json::json!([])), log);

    let report = agent.execute("flood map").await;

    // One call is reserved for generation, so the loop stops at max - 1
    assert_eq!(report.llm_calls_made, 4);
    assert!(report.llm_calls_made <= 4);
    assert_eq!(report.iterations_completed, 2);
    assert!(report.success);
}

// ============================================================================
// Generation Guardrails
// ============================================================================

#[tokio::test]
async fn test_finish_blocked_with_zero_successful_calls() {
    let config = AgentConfig::default().with_max_iterations(2);
    let llm = Arc::new(ScriptedLlm::new(vec![
        plan_json(),
        finish_json(),
        finish_json(),
        clean_content_json(),
    ]));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(
        config,
        llm,
        static_registry(serde_json::json!([])),
        Arc::clone(&log),
    );

    let report = agent.execute("flood map").await;

    assert!(!report.context.ready_to_generate());
    assert_eq!(report.iterations_completed, 2);
    let messages = agent_messages(&log);
    assert!(messages
        .iter()
        .any(|m| m.contains("Blocked early HTML generation - only 0 successful tool calls")));
    // The forced decision is recorded as the no-op sentinel
    assert!(report
        .context
        .reasoning_steps()
        .iter()
        .all(|step| step.action == "no_action"));
}

#[tokio::test]
async fn test_finish_blocked_with_one_successful_call() {
    let config = AgentConfig::default().with_max_iterations(2);
    let llm = Arc::new(ScriptedLlm::new(vec![
        plan_json(),
        act_json("web_search"),
        finish_json(),
        clean_content_json(),
    ]));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(
        config,
        llm,
        static_registry(serde_json::json!([])),
        Arc::clone(&log),
    );

    let report = agent.execute("flood map").await;

    assert!(!report.context.ready_to_generate());
    assert_eq!(report.context.successful_tool_calls(), 1);
    assert!(agent_messages(&log)
        .iter()
        .any(|m| m.contains("only 1 successful tool calls")));
}

#[tokio::test]
async fn test_finish_blocked_without_catalog_fetch() {
    let config = AgentConfig::default().with_max_iterations(3);
    let llm = Arc::new(ScriptedLlm::new(vec![
        plan_json(),
        act_json("web_search"),
        act_json("web_search"),
        finish_json(),
        clean_content_json(),
    ]));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(
        config,
        llm,
        static_registry(serde_json::json!([])),
        Arc::clone(&log),
    );

    let report = agent.execute("flood map").await;

    assert!(!report.context.ready_to_generate());
    assert_eq!(report.context.successful_tool_calls(), 2);
    assert_eq!(report.context.successful_stac_fetches(), 0);
    assert!(agent_messages(&log)
        .iter()
        .any(|m| m.contains("must fetch STAC data from configured sources first")));
}

#[tokio::test]
async fn test_finish_accepted_with_grounding_research() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        plan_json(),
        act_json("web_search"),
        act_json("fetch_stac_sample_data"),
        finish_json(),
        clean_content_json(),
    ]));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(
        AgentConfig::default(),
        llm,
        static_registry(serde_json::json!([])),
        Arc::clone(&log),
    );

    let report = agent.execute("flood map").await;

    assert!(report.context.ready_to_generate());
    assert!(agent_messages(&log)
        .iter()
        .all(|m| !m.contains("Blocked")));
}

// ============================================================================
// URL Fixing
// ============================================================================

#[tokio::test]
async fn test_invalid_urls_trigger_one_fix_call() {
    let fixed_content = serde_json::json!({
        "title": "Dhaka Flood Monitor",
        "description": "Live flood tracking for Dhaka",
        "main_content": "<div id=\"map\"></div>",
        "custom_css": "#map { height: 400px; }",
        "custom_js": "// URL replaced from research\nconst map = L.map('map');"
    })
    .to_string();

    let llm = Arc::new(ScriptedLlm::new(vec![
        plan_json(),
        act_json("web_search"),
        act_json("fetch_stac_sample_data"),
        finish_json(),
        clean_content_json(),
        fixed_content,
    ]));
    let invalid = serde_json::json!([
        { "url": "https://dead.example.org/api", "status_code": 404, "error": "HTTP 404" }
    ]);
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(
        AgentConfig::default(),
        llm,
        static_registry(invalid),
        Arc::clone(&log),
    );

    let report = agent.execute("flood map").await;

    assert!(report.success);
    assert_eq!(report.llm_calls_made, 6);
    assert!(report
        .html_content
        .unwrap()
        .custom_js
        .contains("URL replaced from research"));
    assert!(agent_messages(&log)
        .iter()
        .any(|m| m.contains("Applied URL fixes to generated content")));
}

#[tokio::test]
async fn test_url_fix_skipped_when_budget_exhausted() {
    // Budget: planning 1 + reasoning 3 (reserve 1) + generation 1 = 5
    let config = AgentConfig::default()
        .with_max_iterations(3)
        .with_max_llm_calls(5);
    let llm = Arc::new(ScriptedLlm::new(vec![
        plan_json(),
        act_json("web_search"),
        act_json("fetch_stac_sample_data"),
        finish_json(),
        clean_content_json(),
    ]));
    let invalid = serde_json::json!([
        { "url": "https://dead.example.org/api", "status_code": 404, "error": "HTTP 404" }
    ]);
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(config, Arc::clone(&llm), static_registry(invalid), log);

    let report = agent.execute("flood map").await;

    assert!(report.success);
    assert_eq!(report.llm_calls_made, 5);
    // No fix call was made; the content is the generated one unchanged
    assert_eq!(llm.calls(), 5);
    assert!(!report.html_content.unwrap().custom_js.contains("replaced"));
}

// ============================================================================
// Failure Paths
// ============================================================================

#[tokio::test]
async fn test_planning_failure_fails_the_execution() {
    let llm = Arc::new(ScriptedLlm::new(vec!["this is not a plan".to_string()]));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(
        AgentConfig::default(),
        llm,
        static_registry(serde_json::json!([])),
        log,
    );

    let report = agent.execute("flood map").await;

    assert!(!report.success);
    assert!(report.error.unwrap().starts_with("Planning failed:"));
    assert_eq!(report.iterations_completed, 0);
    assert!(report.html_content.is_none());
}

#[tokio::test]
async fn test_unparseable_reasoning_is_fail_soft() {
    let config = AgentConfig::default().with_max_iterations(1);
    let llm = Arc::new(ScriptedLlm::new(vec![
        plan_json(),
        "I will search the web next.".to_string(),
        clean_content_json(),
    ]));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(config, llm, static_registry(serde_json::json!([])), log);

    let report = agent.execute("flood map").await;

    assert!(report.success);
    let steps = report.context.reasoning_steps();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].action, "no_action");
    assert!(steps[0].reasoning.contains("JSON parsing failed"));
}

#[tokio::test]
async fn test_model_transport_error_fails_toward_generation() {
    // Call 1 (planning) succeeds, every later call times out: the reasoning
    // step degrades to a finish decision, then generation itself fails.
    let llm = Arc::new(ScriptedLlm::new(vec![plan_json()]).with_failure_after(1));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(
        AgentConfig::default(),
        llm,
        static_registry(serde_json::json!([])),
        log,
    );

    let report = agent.execute("flood map").await;

    assert!(!report.success);
    assert!(report.context.ready_to_generate());
    assert!(report
        .error
        .unwrap()
        .starts_with("Final HTML generation failed:"));
}

#[tokio::test]
async fn test_generation_with_issues_reports_validation() {
    // Generation returns content with a missing map element; the scripted
    // model then repeats that same content, so repair cannot make progress.
    let llm = Arc::new(ScriptedLlm::new(vec![
        plan_json(),
        act_json("web_search"),
        act_json("fetch_stac_sample_data"),
        finish_json(),
        broken_content_json(),
    ]));
    let log = Arc::new(MemorySessionLog::new());
    let mut agent = make_agent(
        AgentConfig::default(),
        llm,
        static_registry(serde_json::json!([])),
        log,
    );

    let report = agent.execute("flood map").await;

    assert!(report.success);
    let validation = report.html_validation.unwrap();
    assert!(!validation.content_fixed);
    assert!(validation.original_validation.needs_fixing);
    assert!(validation.message.contains("could not auto-fix"));
}
