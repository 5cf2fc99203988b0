//! HTML Endpoint Extraction & Validation
//!
//! Scans generated HTML/JavaScript for API calls, filters the matches down
//! to URL-looking strings, and probes each candidate with a HEAD request.
//! Relative URLs are reported unconditionally invalid: without a base domain
//! there is nothing to probe.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use relief_forge_core::{ResearchTool, ToolOutput};
use relief_forge_llm::build_http_client;

/// A URL candidate extracted from page content.
#[derive(Debug, Clone)]
pub struct UrlCandidate {
    /// The extracted URL text
    pub url: String,
    /// Surrounding source text, single-line
    pub context: String,
    /// 1-based line number of the match
    pub line_number: usize,
}

/// The fixed set of extraction patterns: fetch/axios/XHR calls, URL-shaped
/// variable assignments, and catalog-search-shaped string literals.
fn url_patterns() -> Vec<Regex> {
    [
        // fetch() calls
        r#"(?i)fetch\s*\(\s*['"]([^'"]+)['"]"#,
        r#"(?i)fetch\s*\(\s*`([^`]+)`"#,
        // axios calls
        r#"(?i)axios\.get\s*\(\s*['"]([^'"]+)['"]"#,
        r#"(?i)axios\.post\s*\(\s*['"]([^'"]+)['"]"#,
        r#"(?i)axios\(\s*['"]([^'"]+)['"]"#,
        // XMLHttpRequest
        r#"(?i)\.open\s*\(\s*['"][^'"]*['"],\s*['"]([^'"]+)['"]"#,
        // Direct URL assignments
        r#"(?i)(?:const|let|var)\s+\w+\s*=\s*['"]([^'"]*(?:api|search|endpoint)[^'"]*)['"]"#,
        // STAC specific patterns
        r#"(?i)['"]([^'"]*stac[^'"]*search[^'"]*)['"]"#,
        r#"(?i)['"]([^'"]*search[^'"]*collections[^'"]*)['"]"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
}

/// Whether extracted text plausibly names an API endpoint.
///
/// Must be absolute http(s) or root-relative, AND mention one of the API
/// indicator substrings; this drops variable names, fragments, and asset
/// paths the patterns inevitably catch.
pub fn looks_like_api_url(text: &str) -> bool {
    if text.len() < 4 {
        return false;
    }
    if !(text.starts_with("http://") || text.starts_with("https://") || text.starts_with('/')) {
        return false;
    }
    const API_INDICATORS: [&str; 6] = ["api", "search", "endpoint", "data", "service", "stac"];
    let lower = text.to_lowercase();
    API_INDICATORS.iter().any(|ind| lower.contains(ind))
}

/// Extract deduplicated URL candidates from combined HTML/JS content.
pub fn extract_candidate_urls(content: &str) -> Vec<UrlCandidate> {
    let mut candidates = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for pattern in url_patterns() {
        for caps in pattern.captures_iter(content) {
            let Some(group) = caps.get(1) else { continue };
            let url = group.as_str().trim().to_string();

            if !looks_like_api_url(&url) || seen.contains(&url) {
                continue;
            }
            seen.insert(url.clone());

            let context = surrounding_context(content, group.start(), group.end());
            let line_number = content[..group.start()].matches('\n').count() + 1;
            candidates.push(UrlCandidate {
                url,
                context,
                line_number,
            });
        }
    }

    candidates
}

/// Up to 50 bytes of context either side of a match, flattened to one line.
fn surrounding_context(content: &str, start: usize, end: usize) -> String {
    let mut from = start.saturating_sub(50);
    while !content.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + 50).min(content.len());
    while !content.is_char_boundary(to) {
        to += 1;
    }
    content[from..to].replace('\n', " ").trim().to_string()
}

/// The `validate_html_endpoints` research tool.
pub struct HtmlEndpointsTool {
    client: reqwest::Client,
    timeout: Duration,
}

impl HtmlEndpointsTool {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_http_client(timeout),
            timeout,
        }
    }

    /// Probe one extracted URL with a HEAD request.
    async fn validate_single_url(&self, url: &str) -> Value {
        // Relative URLs cannot be probed at all
        if url.starts_with('/') {
            return serde_json::json!({
                "is_accessible": false,
                "status_code": null,
                "error": "Relative URL - cannot validate without base domain",
                "response_time": null,
            });
        }

        if url::Url::parse(url)
            .map(|u| u.host_str().is_none())
            .unwrap_or(true)
        {
            return serde_json::json!({
                "is_accessible": false,
                "status_code": null,
                "error": "Invalid URL format",
                "response_time": null,
            });
        }

        let started = Instant::now();
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let final_url = response.url().to_string();
                serde_json::json!({
                    "is_accessible": status < 400,
                    "status_code": status,
                    "error": if status < 400 { Value::Null } else { Value::from(format!("HTTP {}", status)) },
                    "response_time": started.elapsed().as_secs_f64(),
                    "final_url": if final_url != url { Value::from(final_url) } else { Value::Null },
                })
            }
            Err(err) if err.is_timeout() => serde_json::json!({
                "is_accessible": false,
                "status_code": null,
                "error": "Request timeout",
                "response_time": self.timeout.as_secs_f64(),
            }),
            Err(err) => serde_json::json!({
                "is_accessible": false,
                "status_code": null,
                "error": err.to_string(),
                "response_time": null,
            }),
        }
    }
}

#[async_trait]
impl ResearchTool for HtmlEndpointsTool {
    fn name(&self) -> &str {
        relief_forge_core::tool_names::VALIDATE_HTML_ENDPOINTS
    }

    fn description(&self) -> &str {
        "Extract and validate all API endpoints found in HTML/JavaScript code to ensure they are accessible and working."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "html_content": {
                "type": "string",
                "description": "HTML content containing JavaScript with API calls to validate"
            },
            "js_content": {
                "type": "string",
                "description": "JavaScript content with API calls to validate (optional)",
                "default": ""
            }
        })
    }

    async fn execute(&self, parameters: &Value) -> ToolOutput {
        let html_content = match parameters.get("html_content").and_then(|v| v.as_str()) {
            Some(h) => h,
            None => return ToolOutput::err("Missing required parameter: html_content"),
        };
        let js_content = parameters
            .get("js_content")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        let combined = format!("{}\n{}", html_content, js_content);
        let candidates = extract_candidate_urls(&combined);

        if candidates.is_empty() {
            return ToolOutput::ok()
                .with("urls_found", 0)
                .with("valid_urls", Vec::<Value>::new())
                .with("invalid_urls", Vec::<Value>::new())
                .with("message", "No API endpoints found in content");
        }

        let mut valid_urls = Vec::new();
        let mut invalid_urls = Vec::new();

        for candidate in &candidates {
            let verdict = self.validate_single_url(&candidate.url).await;
            let mut entry = serde_json::json!({
                "url": candidate.url,
                "context": candidate.context,
                "line_number": candidate.line_number,
            });
            if let (Some(entry_map), Some(verdict_map)) =
                (entry.as_object_mut(), verdict.as_object())
            {
                for (k, v) in verdict_map {
                    entry_map.insert(k.clone(), v.clone());
                }
            }

            if verdict["is_accessible"].as_bool().unwrap_or(false) {
                valid_urls.push(entry);
            } else {
                invalid_urls.push(entry);
            }
        }

        let summary = validation_summary(&valid_urls, &invalid_urls);

        ToolOutput::ok()
            .with("urls_found", candidates.len())
            .with("valid_urls", valid_urls)
            .with("invalid_urls", invalid_urls)
            .with("validation_summary", summary)
    }
}

/// Human-readable validation summary, capped at 5 entries per group.
fn validation_summary(valid_urls: &[Value], invalid_urls: &[Value]) -> String {
    let mut parts = Vec::new();

    if !valid_urls.is_empty() {
        parts.push(format!("{} valid endpoints:", valid_urls.len()));
        for entry in valid_urls.iter().take(5) {
            parts.push(format!(
                "  - {} ({})",
                entry["url"].as_str().unwrap_or(""),
                entry["status_code"].as_u64().unwrap_or(0)
            ));
        }
        if valid_urls.len() > 5 {
            parts.push(format!("  ...and {} more", valid_urls.len() - 5));
        }
    }

    if !invalid_urls.is_empty() {
        parts.push(format!("{} invalid endpoints:", invalid_urls.len()));
        for entry in invalid_urls.iter().take(5) {
            parts.push(format!(
                "  - {} - {}",
                entry["url"].as_str().unwrap_or(""),
                entry["error"].as_str().unwrap_or("unknown error")
            ));
        }
        if invalid_urls.len() > 5 {
            parts.push(format!("  ...and {} more", invalid_urls.len() - 5));
        }
    }

    parts.join("\n")
}
