//! Settings
//!
//! TOML-backed configuration for the CLI: agent tunables, model selection,
//! search provider, and the configured data sources and templates. The API
//! key itself comes from the environment, never the settings file.

use serde::{Deserialize, Serialize};

use relief_forge_core::{AgentConfig, CoreError, CoreResult, DataSourceInfo, TemplateInfo};

/// Model provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Optional endpoint override
    pub base_url: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: None,
        }
    }
}

/// Web search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Provider name: "duckduckgo" or "tavily"
    pub provider: String,
    /// Environment variable holding the provider API key, if one is needed
    pub api_key_env: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: "duckduckgo".to_string(),
            api_key_env: None,
        }
    }
}

/// Full settings file shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Agent budgets and flags
    pub agent: AgentConfig,
    /// Model provider
    pub llm: LlmSettings,
    /// Web search provider
    pub search: SearchSettings,
    /// Configured data sources
    pub data_sources: Vec<DataSourceInfo>,
    /// Configured page templates
    pub templates: Vec<TemplateInfo>,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| CoreError::parse(format!("settings: {}", e)))?;
        settings.agent.validate()?;
        Ok(settings)
    }

    /// Load settings from a file, or defaults when the file is absent.
    pub fn load(path: &std::path::Path) -> CoreResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(CoreError::config(format!(
                "cannot read settings file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.llm.model, "gpt-4o-mini");
        assert_eq!(settings.search.provider, "duckduckgo");
        assert!(settings.data_sources.is_empty());
    }

    #[test]
    fn test_parse_full_settings() {
        let text = r#"
[agent]
max_iterations = 6
max_llm_calls = 8

[llm]
model = "gpt-4o"
api_key_env = "OPENAI_API_KEY"

[search]
provider = "tavily"
api_key_env = "TAVILY_API_KEY"

[[data_sources]]
name = "Montandon Event Catalog"
category = "geospatial"
description = "Global disaster event catalog"

[data_sources.kind]
type = "search_catalog"
search_url = "https://montandon.example.org/stac/search"
collections = ["gdacs-events", "emdat-impacts"]

[[templates]]
name = "Enhanced Map Template"
description = "map layouts with utility functions"
"#;
        let settings = Settings::from_toml_str(text).unwrap();
        assert_eq!(settings.agent.max_iterations, 6);
        assert_eq!(settings.llm.model, "gpt-4o");
        assert_eq!(settings.search.provider, "tavily");
        assert_eq!(settings.data_sources.len(), 1);
        assert!(settings.data_sources[0].is_search_catalog());
        assert_eq!(settings.templates.len(), 1);
    }

    #[test]
    fn test_invalid_budgets_rejected() {
        let text = "[agent]\nmax_llm_calls = 1\n";
        assert!(Settings::from_toml_str(text).is_err());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(Settings::from_toml_str("not toml [").is_err());
    }
}
