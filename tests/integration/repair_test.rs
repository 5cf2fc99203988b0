//! Repair Agent Integration Tests
//!
//! The repair agent accepts a fix only when the issue count strictly
//! decreases, and previously-valid content passes validation untouched.

use std::sync::Arc;

use relief_forge::core::PageContent;
use relief_forge::{MemorySessionLog, RepairAgent};

use crate::support::{broken_content_json, clean_content_json, ScriptedLlm};

fn content_from(json: &str) -> PageContent {
    serde_json::from_str(json).unwrap()
}

fn make_repair_agent(llm: Arc<ScriptedLlm>) -> RepairAgent {
    RepairAgent::new(llm, Arc::new(MemorySessionLog::new()), 6000)
}

#[tokio::test]
async fn test_clean_content_round_trips_without_model_calls() {
    let llm = Arc::new(ScriptedLlm::new(Vec::<String>::new()));
    let agent = make_repair_agent(Arc::clone(&llm));
    let content = content_from(&clean_content_json());

    let outcome = agent.validate_and_fix(&content).await;

    assert!(!outcome.content_fixed);
    assert!(!outcome.original_validation.needs_fixing);
    assert_eq!(outcome.final_validation.total_issues, 0);
    assert_eq!(outcome.message, "Content passed all validations");
    assert_eq!(outcome.content, content);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_identical_model_output_exhausts_attempts() {
    // The scripted model returns the broken content unchanged, so no
    // attempt ever reduces the issue count.
    let llm = Arc::new(ScriptedLlm::new(vec![broken_content_json()]));
    let agent = make_repair_agent(Arc::clone(&llm));
    let content = content_from(&broken_content_json());

    let outcome = agent.validate_and_fix(&content).await;

    assert!(!outcome.content_fixed);
    assert!(outcome.message.contains("could not auto-fix"));
    assert_eq!(outcome.content, content);
    assert!(outcome.improvements.is_none());
    // Exactly the attempt cap, no more
    assert_eq!(llm.calls(), 2);
}

#[tokio::test]
async fn test_improving_fix_is_accepted_on_first_attempt() {
    let llm = Arc::new(ScriptedLlm::new(vec![clean_content_json()]));
    let agent = make_repair_agent(Arc::clone(&llm));
    let content = content_from(&broken_content_json());

    let outcome = agent.validate_and_fix(&content).await;

    assert!(outcome.content_fixed);
    assert_eq!(llm.calls(), 1);
    assert!(outcome.original_validation.total_issues > 0);
    assert_eq!(outcome.final_validation.total_issues, 0);
    assert_eq!(outcome.content.main_content, "<div id=\"map\"></div>");

    let improvements = outcome.improvements.unwrap();
    assert_eq!(
        improvements.issues_fixed,
        outcome.original_validation.total_issues as i64
    );
    assert_eq!(improvements.remaining_issues, 0);
    assert!(improvements.severity_improved);
}

#[tokio::test]
async fn test_unparseable_fix_response_consumes_attempt() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        "not json".to_string(),
        clean_content_json(),
    ]));
    let agent = make_repair_agent(Arc::clone(&llm));
    let content = content_from(&broken_content_json());

    let outcome = agent.validate_and_fix(&content).await;

    // First attempt fails to decode, second succeeds and is accepted
    assert!(outcome.content_fixed);
    assert_eq!(llm.calls(), 2);
}

#[tokio::test]
async fn test_fix_with_dropped_fields_keeps_prior_values() {
    // The model's fix omits every field except the repaired ones; the
    // dropped fields must keep their previous values.
    let partial_fix = serde_json::json!({
        "main_content": "<div id=\"ghostMap\"></div>",
        "custom_js": "const map = L.map('ghostMap');"
    })
    .to_string();
    let llm = Arc::new(ScriptedLlm::new(vec![partial_fix]));
    let agent = make_repair_agent(llm);
    let content = content_from(&broken_content_json());

    let outcome = agent.validate_and_fix(&content).await;

    assert!(outcome.content_fixed);
    assert_eq!(outcome.content.title, "Dhaka Flood Monitor");
    assert_eq!(outcome.content.description, "Live flood tracking for Dhaka");
    assert!(outcome.content.main_content.contains("ghostMap"));
}

#[tokio::test]
async fn test_validate_only_does_not_call_the_model() {
    let llm = Arc::new(ScriptedLlm::new(Vec::<String>::new()));
    let agent = make_repair_agent(Arc::clone(&llm));

    let report = agent.validate_only(&content_from(&broken_content_json()));

    assert!(report.needs_fixing);
    assert!(report.total_issues > 0);
    assert_eq!(llm.calls(), 0);
}
