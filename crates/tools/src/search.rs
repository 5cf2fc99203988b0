//! Web Search Tool
//!
//! Pluggable web search with Tavily (API key) and DuckDuckGo (keyless)
//! providers, wrapped as the `web_search` research tool. Results carry the
//! source domain and rank so the digest step can attribute findings.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use relief_forge_core::{ResearchTool, ToolOutput};
use relief_forge_llm::build_http_client;

/// A search result entry
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Trait for pluggable search providers
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for display
    fn name(&self) -> &str;

    /// Execute a search query
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, String>;
}

/// Tavily search provider (requires API key)
struct TavilyProvider {
    client: reqwest::Client,
    api_key: String,
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    fn name(&self) -> &str {
        "Tavily"
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, String> {
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": max_results,
            "include_answer": false,
        });

        let response = self
            .client
            .post("https://api.tavily.com/search")
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Tavily request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let err_body = response.text().await.unwrap_or_default();
            return Err(format!("Tavily API error ({}): {}", status.as_u16(), err_body));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Tavily response: {}", e))?;

        Ok(parse_tavily_results(&data))
    }
}

fn parse_tavily_results(data: &Value) -> Vec<SearchHit> {
    data.get("results")
        .and_then(|r| r.as_array())
        .map(|arr| {
            arr.iter()
                .map(|item| SearchHit {
                    title: item.get("title").and_then(|t| t.as_str()).unwrap_or("").to_string(),
                    url: item.get("url").and_then(|u| u.as_str()).unwrap_or("").to_string(),
                    snippet: item
                        .get("content")
                        .and_then(|c| c.as_str())
                        .unwrap_or("")
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// DuckDuckGo instant answer provider (no API key required, limited results)
struct DuckDuckGoProvider {
    client: reqwest::Client,
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &str {
        "DuckDuckGo"
    }

    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, String> {
        let response = self
            .client
            .get("https://api.duckduckgo.com/")
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await
            .map_err(|e| format!("DuckDuckGo request failed: {}", e))?;

        let data: Value = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse DuckDuckGo response: {}", e))?;

        Ok(parse_duckduckgo_results(&data, max_results))
    }
}

fn parse_duckduckgo_results(data: &Value, max_results: u32) -> Vec<SearchHit> {
    let mut results = Vec::new();

    // Abstract (main result)
    if let Some(abstract_text) = data.get("AbstractText").and_then(|t| t.as_str()) {
        if !abstract_text.is_empty() {
            results.push(SearchHit {
                title: data
                    .get("Heading")
                    .and_then(|h| h.as_str())
                    .unwrap_or("Result")
                    .to_string(),
                url: data
                    .get("AbstractURL")
                    .and_then(|u| u.as_str())
                    .unwrap_or("")
                    .to_string(),
                snippet: abstract_text.to_string(),
            });
        }
    }

    // Related topics
    if let Some(topics) = data.get("RelatedTopics").and_then(|r| r.as_array()) {
        for topic in topics {
            if results.len() >= max_results as usize {
                break;
            }
            if let Some(text) = topic.get("Text").and_then(|t| t.as_str()) {
                results.push(SearchHit {
                    title: text.chars().take(80).collect::<String>(),
                    url: topic
                        .get("FirstURL")
                        .and_then(|u| u.as_str())
                        .unwrap_or("")
                        .to_string(),
                    snippet: text.to_string(),
                });
            }
        }
    }

    results
}

/// Web search service with a pluggable provider.
pub struct WebSearchService {
    provider: Box<dyn SearchProvider>,
}

impl WebSearchService {
    /// Create a service with the specified provider.
    ///
    /// - `"tavily"` requires an API key
    /// - `"duckduckgo"` (or empty) works without an API key
    pub fn new(
        provider_name: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, String> {
        let client = build_http_client(timeout);

        let provider: Box<dyn SearchProvider> = match provider_name.to_lowercase().as_str() {
            "tavily" => {
                let key = api_key
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| "Tavily requires an API key".to_string())?;
                Box::new(TavilyProvider {
                    client,
                    api_key: key.to_string(),
                })
            }
            "duckduckgo" | "" => Box::new(DuckDuckGoProvider { client }),
            other => {
                return Err(format!(
                    "Unknown search provider: '{}'. Supported: tavily, duckduckgo",
                    other
                ))
            }
        };

        Ok(Self { provider })
    }

    /// Create a keyless DuckDuckGo-backed service.
    pub fn duckduckgo(timeout: Duration) -> Self {
        Self {
            provider: Box::new(DuckDuckGoProvider {
                client: build_http_client(timeout),
            }),
        }
    }

    /// Execute a web search.
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, String> {
        // Strip control chars before handing the query to the provider
        let query: String = query
            .chars()
            .filter(|c| !c.is_control() || *c == ' ')
            .collect();

        if query.trim().is_empty() {
            return Err("Search query cannot be empty".to_string());
        }

        self.provider.search(&query, max_results).await
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

/// Extract the host for source attribution.
fn extract_domain(raw: &str) -> String {
    url::Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string())
}

/// The `web_search` research tool.
pub struct WebSearchTool {
    service: WebSearchService,
}

impl WebSearchTool {
    pub fn new(service: WebSearchService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ResearchTool for WebSearchTool {
    fn name(&self) -> &str {
        relief_forge_core::tool_names::WEB_SEARCH
    }

    fn description(&self) -> &str {
        "Search the web for current information about disasters, news, or specific topics. Returns recent web results with titles, descriptions, and URLs."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "query": {
                "type": "string",
                "description": "Search query (e.g. 'Bangladesh floods 2024', 'earthquake Turkey recent')"
            },
            "limit": {
                "type": "integer",
                "description": "Number of results to return (default: 5, max: 10)",
                "minimum": 1,
                "maximum": 10
            }
        })
    }

    async fn execute(&self, parameters: &Value) -> ToolOutput {
        let query = match parameters.get("query").and_then(|v| v.as_str()) {
            Some(q) => q.to_string(),
            None => return ToolOutput::err("Missing required parameter: query"),
        };
        let limit = parameters
            .get("limit")
            .and_then(|v| v.as_u64())
            .unwrap_or(5)
            .clamp(1, 10) as u32;

        let started = Instant::now();
        match self.service.search(&query, limit).await {
            Ok(hits) => {
                let results: Vec<Value> = hits
                    .iter()
                    .enumerate()
                    .map(|(i, hit)| {
                        serde_json::json!({
                            "title": hit.title,
                            "description": hit.snippet,
                            "url": hit.url,
                            "source": extract_domain(&hit.url),
                            "search_rank": i + 1,
                        })
                    })
                    .collect();

                ToolOutput::ok()
                    .with("query", query)
                    .with("total_found", results.len())
                    .with("results", results)
                    .with(
                        "search_time",
                        format!("{:.3}s", started.elapsed().as_secs_f64()),
                    )
                    .with("search_engine", self.service.provider_name())
            }
            Err(error) => {
                tracing::warn!(%query, %error, "web search failed");
                ToolOutput::err(error)
                    .with("query", query)
                    .with("search_engine", self.service.provider_name())
            }
        }
    }
}
