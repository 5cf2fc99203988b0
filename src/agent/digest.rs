//! Context Digests
//!
//! Two summaries derived from the session context: a rolling short summary
//! of the last few tool results for the reasoning prompt, and the full
//! intelligence digest the generation prompt is built from. Each tool type
//! has its own summarization rule so the model sees what matters (titles
//! and sources for searches, property names for catalog samples, status for
//! endpoint probes).

use relief_forge_core::{tool_names, SessionContext, ToolOutput};

/// Truncate to a character budget with a trailing ellipsis.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

/// One-line summary of a successful tool result.
pub fn summarize_tool_result(result: &ToolOutput) -> String {
    if let Some(results) = result.get("results").and_then(|r| r.as_array()) {
        return format!("Found {} web results", results.len());
    }
    if result.get("sample_features").is_some() {
        let total = result
            .get("total_found")
            .and_then(|t| t.as_u64())
            .unwrap_or(0);
        let properties: Vec<&str> = result
            .get("available_properties")
            .and_then(|p| p.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).take(5).collect())
            .unwrap_or_default();
        return format!(
            "Found {} data items with properties: {}",
            total,
            properties.join(", ")
        );
    }
    if let Some(accessible) = result.get("is_accessible").and_then(|a| a.as_bool()) {
        let status = result
            .get("status_code")
            .and_then(|s| s.as_u64())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let word = if accessible { "accessible" } else { "not accessible" };
        return format!("API endpoint is {} (status: {})", word, status);
    }
    "Data retrieved successfully".to_string()
}

/// Rolling summary of the last 3 tool results for the reasoning prompt.
pub fn context_summary(context: &SessionContext) -> String {
    let recent = context.recent_tool_results(3);
    if recent.is_empty() {
        return "No information gathered yet.".to_string();
    }

    let mut parts = vec!["Information gathered:".to_string()];
    for (i, record) in recent.iter().enumerate() {
        let line = if record.result.success {
            format!(
                "{}. {}: {}",
                i + 1,
                record.action.action,
                summarize_tool_result(&record.result)
            )
        } else {
            format!(
                "{}. {}: Failed - {}",
                i + 1,
                record.action.action,
                record.result.error.as_deref().unwrap_or("Unknown error")
            )
        };
        parts.push(line);
    }
    parts.join("\n")
}

/// Full digest of every tool result for the generation prompt.
pub fn intelligence_summary(context: &SessionContext) -> String {
    let mut parts = vec!["RESEARCH FINDINGS:".to_string()];

    for (i, record) in context.tool_results().iter().enumerate() {
        let action_name = &record.action.action;
        parts.push(format!("\n{}. {}:", i + 1, action_name.to_uppercase()));

        let result = &record.result;
        if !result.success {
            parts.push(format!(
                "   FAILED: {}",
                result.error.as_deref().unwrap_or("Unknown error")
            ));
            continue;
        }

        match action_name.as_str() {
            tool_names::WEB_SEARCH => {
                let query = record
                    .action
                    .parameters
                    .get("query")
                    .and_then(|q| q.as_str())
                    .unwrap_or("");
                parts.push(format!("   Query: {}", query));

                let results = result
                    .get("results")
                    .and_then(|r| r.as_array())
                    .cloned()
                    .unwrap_or_default();
                parts.push(format!("   Found {} current results:", results.len()));
                for (j, entry) in results.iter().take(3).enumerate() {
                    parts.push(format!(
                        "   {}. {}",
                        j + 1,
                        entry.get("title").and_then(|t| t.as_str()).unwrap_or("")
                    ));
                    parts.push(format!(
                        "      {}",
                        truncate(
                            entry
                                .get("description")
                                .and_then(|d| d.as_str())
                                .unwrap_or(""),
                            100
                        )
                    ));
                    parts.push(format!(
                        "      Source: {}",
                        entry.get("url").and_then(|u| u.as_str()).unwrap_or("")
                    ));
                }
            }
            tool_names::FETCH_STAC_SAMPLE_DATA => {
                parts.push(format!(
                    "   Collection: {}",
                    result.get_str("collection").unwrap_or("")
                ));
                parts.push(format!(
                    "   Found {} data items",
                    result
                        .get("total_found")
                        .and_then(|t| t.as_u64())
                        .unwrap_or(0)
                ));
                let properties: Vec<&str> = result
                    .get("available_properties")
                    .and_then(|p| p.as_array())
                    .map(|arr| arr.iter().filter_map(|v| v.as_str()).take(10).collect())
                    .unwrap_or_default();
                parts.push(format!("   Available properties: {}", properties.join(", ")));
            }
            tool_names::VALIDATE_API_ENDPOINT => {
                let accessible = result
                    .get("is_accessible")
                    .and_then(|a| a.as_bool())
                    .unwrap_or(false);
                let status = result
                    .get("status_code")
                    .and_then(|s| s.as_u64())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                parts.push(format!("   URL: {}", result.get_str("url").unwrap_or("")));
                parts.push(format!(
                    "   Status: {} ({})",
                    status,
                    if accessible { "accessible" } else { "not accessible" }
                ));
            }
            _ => {
                parts.push(format!("   {}", summarize_tool_result(result)));
            }
        }
    }

    if context.tool_results().is_empty() {
        parts.push("No additional research conducted.".to_string());
    }

    parts.join("\n")
}
