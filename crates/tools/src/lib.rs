//! Relief Forge Tools
//!
//! The four research tools the REACT loop can dispatch, plus the default
//! registry assembly:
//!
//! - `search` - web search with pluggable providers (`web_search`)
//! - `endpoint` - API endpoint probing (`validate_api_endpoint`)
//! - `stac` - catalog sample fetch (`fetch_stac_sample_data`)
//! - `html_endpoints` - URL extraction + HEAD validation (`validate_html_endpoints`)
//!
//! Every tool is stateless and idempotent aside from its outbound requests,
//! and encodes all failures into `ToolOutput` instead of returning errors.

pub mod endpoint;
pub mod html_endpoints;
pub mod registry;
pub mod search;
pub mod stac;

// Re-export tool types
pub use endpoint::EndpointValidatorTool;
pub use html_endpoints::{extract_candidate_urls, looks_like_api_url, HtmlEndpointsTool, UrlCandidate};
pub use registry::{default_registry, registry_with_search};
pub use search::{SearchHit, SearchProvider, WebSearchService, WebSearchTool};
pub use stac::StacSampleTool;
