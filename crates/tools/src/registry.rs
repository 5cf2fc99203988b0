//! Default Tool Registry
//!
//! Assembles the enabled research tool set from configuration flags. Web
//! search and endpoint validation are optional; the STAC sample fetch and
//! HTML endpoint validation are always registered.

use std::sync::Arc;
use std::time::Duration;

use relief_forge_core::{AgentConfig, SourceCatalog, ToolRegistry};

use crate::endpoint::EndpointValidatorTool;
use crate::html_endpoints::HtmlEndpointsTool;
use crate::search::{WebSearchService, WebSearchTool};
use crate::stac::StacSampleTool;

/// Build the default registry with a keyless DuckDuckGo search backend.
pub fn default_registry(config: &AgentConfig, catalog: SourceCatalog) -> ToolRegistry {
    let timeout = Duration::from_secs(config.tool_timeout_secs);
    let search = config
        .enable_web_search
        .then(|| WebSearchService::duckduckgo(timeout));
    registry_with_search(config, catalog, search)
}

/// Build the registry with an explicit search service (or none).
pub fn registry_with_search(
    config: &AgentConfig,
    catalog: SourceCatalog,
    search: Option<WebSearchService>,
) -> ToolRegistry {
    let timeout = Duration::from_secs(config.tool_timeout_secs);
    let mut registry = ToolRegistry::new();

    if config.enable_web_search {
        if let Some(service) = search {
            registry.register(Arc::new(WebSearchTool::new(service)));
        }
    }
    if config.enable_endpoint_validation {
        registry.register(Arc::new(EndpointValidatorTool::new(timeout)));
    }
    registry.register(Arc::new(StacSampleTool::new(catalog, timeout)));
    registry.register(Arc::new(HtmlEndpointsTool::new(timeout)));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_forge_core::tool_names;

    #[test]
    fn test_all_tools_enabled() {
        let config = AgentConfig::default();
        let registry = default_registry(&config, SourceCatalog::default());
        assert_eq!(
            registry.names(),
            vec![
                tool_names::WEB_SEARCH,
                tool_names::VALIDATE_API_ENDPOINT,
                tool_names::FETCH_STAC_SAMPLE_DATA,
                tool_names::VALIDATE_HTML_ENDPOINTS,
            ]
        );
    }

    #[test]
    fn test_optional_tools_can_be_disabled() {
        let config = AgentConfig::default()
            .with_web_search(false)
            .with_endpoint_validation(false);
        let registry = default_registry(&config, SourceCatalog::default());
        assert_eq!(
            registry.names(),
            vec![
                tool_names::FETCH_STAC_SAMPLE_DATA,
                tool_names::VALIDATE_HTML_ENDPOINTS,
            ]
        );
    }

    #[test]
    fn test_catalog_text_lists_descriptions() {
        let config = AgentConfig::default();
        let registry = default_registry(&config, SourceCatalog::default());
        let text = registry.catalog_text();
        assert!(text.contains("- web_search: Search the web"));
        assert!(text.contains("- fetch_stac_sample_data: Fetch sample data"));
    }
}
