//! Model Response Decoding
//!
//! Model responses are raw text expected to contain a JSON object, possibly
//! wrapped in markdown code fences. This module strips the fences and, when
//! a parse fails on bad string escaping, applies a bounded set of backslash
//! repairs before giving up.
//!
//! The escape repair is a best-effort fallback only: pattern-based backslash
//! doubling can corrupt content that was already escaped correctly, so it
//! runs exclusively on text that failed to parse as-is.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{LlmError, LlmResult};

/// Strip a leading/trailing markdown code fence from a model response.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence line itself ("```json" or bare "```")
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.strip_prefix("json").unwrap_or(rest),
    };
    body.trim().strip_suffix("```").unwrap_or(body).trim()
}

/// Apply the known backslash repairs to JSON-ish text that failed to parse.
///
/// Targets the patterns models actually emit inside generated JavaScript:
/// unescaped regex classes (`\s+`, `\w+`, `\d+`), raw control escapes
/// (`\n`, `\t`, `\r`), and lone backslashes.
pub fn repair_json_escapes(text: &str) -> String {
    // Patterns interpret escapes; replacements are literal, so identical
    // source text doubles the backslash.
    let fixes: [(&str, &str); 7] = [
        (r"\\s\+", r"\\s\+"),
        (r"\\w\+", r"\\w\+"),
        (r"\\d\+", r"\\d\+"),
        (r"\\n", r"\\n"),
        (r"\\t", r"\\t"),
        (r"\\r", r"\\r"),
        // A single backslash between ordinary characters becomes doubled
        (r#"([^\\])\\([^\\"])"#, r"${1}\\${2}"),
    ];

    let mut fixed = text.to_string();
    for (pattern, replacement) in fixes {
        let re = Regex::new(pattern).unwrap();
        fixed = re.replace_all(&fixed, replacement).to_string();
    }
    fixed
}

/// Parse a model response into a JSON value.
///
/// Strips markdown fences, parses, and retries once through the escape
/// repair when the initial parse fails.
pub fn parse_json_value(raw: &str) -> LlmResult<Value> {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str(cleaned) {
        Ok(value) => Ok(value),
        Err(original_err) => {
            let repaired = repair_json_escapes(cleaned);
            serde_json::from_str(&repaired).map_err(|_| {
                LlmError::malformed(format!("response is not valid JSON: {}", original_err))
            })
        }
    }
}

/// Parse a model response into a typed structure.
pub fn parse_json_response<T: DeserializeOwned>(raw: &str) -> LlmResult<T> {
    let value = parse_json_value(raw)?;
    serde_json::from_value(value)
        .map_err(|e| LlmError::malformed(format!("response JSON has unexpected shape: {}", e)))
}
