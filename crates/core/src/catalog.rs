//! Data Source Catalog
//!
//! Read-only view of the configured external data sources and page
//! templates. The orchestration loop does not query this catalog directly;
//! it consumes two pre-rendered reference strings injected into every model
//! prompt, plus the first active search catalog for sample fetches.

use serde::{Deserialize, Serialize};

/// What kind of API a data source exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceKind {
    /// A STAC-style search catalog with named, queryable collections.
    SearchCatalog {
        /// Item search endpoint (e.g. `https://host/stac/search`)
        search_url: String,
        /// Queryable collection identifiers
        collections: Vec<String>,
    },
    /// A plain REST API without collection semantics.
    RestApi {
        /// Base URL of the API
        base_url: String,
    },
}

/// One configured external data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceInfo {
    /// Display name
    pub name: String,
    /// Grouping category (e.g. "geospatial", "weather")
    pub category: String,
    /// Human-readable description
    pub description: String,
    /// API shape
    pub kind: SourceKind,
    /// Extra prompt context block for this source, if configured
    #[serde(default)]
    pub llm_context: Option<String>,
    /// Whether the source should be offered to the agent
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl DataSourceInfo {
    /// Whether this source is a queryable search catalog.
    pub fn is_search_catalog(&self) -> bool {
        matches!(self.kind, SourceKind::SearchCatalog { .. })
    }

    /// The item search endpoint, for search catalogs.
    pub fn search_url(&self) -> Option<&str> {
        match &self.kind {
            SourceKind::SearchCatalog { search_url, .. } => Some(search_url),
            SourceKind::RestApi { .. } => None,
        }
    }

    /// Queryable collection identifiers, for search catalogs.
    pub fn collections(&self) -> &[String] {
        match &self.kind {
            SourceKind::SearchCatalog { collections, .. } => collections,
            SourceKind::RestApi { .. } => &[],
        }
    }
}

/// The read-only set of configured data sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceCatalog {
    sources: Vec<DataSourceInfo>,
}

impl SourceCatalog {
    /// Create a catalog from configured sources. Sources are kept in
    /// category-then-name order so the rendered reference is stable.
    pub fn new(mut sources: Vec<DataSourceInfo>) -> Self {
        sources.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.cmp(&b.name))
        });
        Self { sources }
    }

    /// All active sources.
    pub fn active_sources(&self) -> impl Iterator<Item = &DataSourceInfo> {
        self.sources.iter().filter(|s| s.is_active)
    }

    /// The first active search catalog, used for sample data fetches.
    pub fn first_search_catalog(&self) -> Option<&DataSourceInfo> {
        self.active_sources().find(|s| s.is_search_catalog())
    }

    /// Number of active sources.
    pub fn active_count(&self) -> usize {
        self.active_sources().count()
    }

    /// Render the data sources reference block injected into model prompts.
    ///
    /// Configured sources take priority over anything the agent could find
    /// externally, so the block leads with that instruction and closes by
    /// pointing the agent at the sample-fetch tool.
    pub fn data_sources_reference(&self) -> String {
        if self.active_count() == 0 {
            return "No configured data sources available.".to_string();
        }

        let mut parts = vec![
            "PRIORITY DATA SOURCES - USE THESE FIRST:".to_string(),
            "=".repeat(50),
            "These are CONFIGURED, VALIDATED data sources that should be your PRIMARY choice."
                .to_string(),
            "Only use external sources if these don't have the needed data.".to_string(),
        ];

        let mut current_category: Option<&str> = None;
        let mut total_collections = 0usize;

        for source in self.active_sources() {
            if current_category != Some(source.category.as_str()) {
                current_category = Some(source.category.as_str());
                parts.push(format!("\n{}:", source.category.to_uppercase()));
            }

            parts.push(format!("- {}: {}", source.name, source.description));

            if let SourceKind::SearchCatalog {
                search_url,
                collections,
            } = &source.kind
            {
                total_collections += collections.len();
                parts.push(format!("   Search URL: {}", search_url));
                parts.push(format!(
                    "   Available Collections ({} total):",
                    collections.len()
                ));

                for (group_name, group) in group_collections(collections) {
                    if group.is_empty() {
                        continue;
                    }
                    let shown: Vec<&str> = group.iter().take(3).map(|c| c.as_str()).collect();
                    parts.push(format!("     {}: {}", group_name, shown.join(", ")));
                    if group.len() > 3 {
                        parts.push(format!(
                            "         ... and {} more {}",
                            group.len() - 3,
                            group_name.to_lowercase()
                        ));
                    }
                }

                if !collections.is_empty() {
                    parts.push("   Usage Examples:".to_string());
                    for coll in collections.iter().take(2) {
                        parts.push(format!(
                            "     - fetch_stac_sample_data(collection='{}', limit=3)",
                            coll
                        ));
                    }
                    parts.push(
                        "   PRIORITY: Always fetch sample data from these collections FIRST"
                            .to_string(),
                    );
                }
            }

            if let Some(context) = &source.llm_context {
                parts.push(format!("   Context: {}", context));
            }
        }

        parts.push(String::new());
        parts.push("=".repeat(50));
        parts.push(format!(
            "CRITICAL: These {} configured sources contain {} data collections.",
            self.active_count(),
            total_collections
        ));
        parts.push("ALWAYS check these sources BEFORE searching for external alternatives.".to_string());
        parts.push(
            "Use 'fetch_stac_sample_data' tool to get real data structure and examples."
                .to_string(),
        );

        parts.join("\n")
    }
}

/// Group collection identifiers the way the reference text presents them.
fn group_collections(collections: &[String]) -> Vec<(&'static str, Vec<&String>)> {
    let events: Vec<&String> = collections
        .iter()
        .filter(|c| c.to_lowercase().contains("events"))
        .collect();
    let hazards: Vec<&String> = collections
        .iter()
        .filter(|c| c.to_lowercase().contains("hazard"))
        .collect();
    let impacts: Vec<&String> = collections
        .iter()
        .filter(|c| c.to_lowercase().contains("impact"))
        .collect();
    let other: Vec<&String> = collections
        .iter()
        .filter(|c| {
            let lower = c.to_lowercase();
            !lower.contains("events") && !lower.contains("hazard") && !lower.contains("impact")
        })
        .collect();

    vec![
        ("Events", events),
        ("Hazards", hazards),
        ("Impacts", impacts),
        ("Other", other),
    ]
}

/// One available page template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInfo {
    /// Display name
    pub name: String,
    /// What layouts/helpers the template provides
    pub description: String,
}

/// The read-only set of page templates the generated content lands in.
///
/// Every template ships the same pre-loaded library stack, so the reference
/// block mostly exists to stop the model from emitting its own script/link
/// tags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateCatalog {
    templates: Vec<TemplateInfo>,
}

impl TemplateCatalog {
    /// Create a catalog from configured templates.
    pub fn new(templates: Vec<TemplateInfo>) -> Self {
        Self { templates }
    }

    /// Render the templates reference block injected into model prompts.
    pub fn reference(&self) -> String {
        if self.templates.is_empty() {
            return "No HTML templates available - will generate from scratch.".to_string();
        }

        let mut parts = vec![
            "ALL COMMON LIBRARIES ARE PRE-LOADED:".to_string(),
            "=".repeat(50),
            "Every template includes ALL major libraries ready to use:".to_string(),
            String::new(),
            "- LEAFLET (Maps): Use L.map(), L.marker(), etc. directly".to_string(),
            "- CHART.JS (Charts): Use new Chart() directly".to_string(),
            "- BOOTSTRAP (Styling): All CSS classes & JS components available".to_string(),
            "- FONT AWESOME (Icons): Use <i class='fas fa-icon'></i>".to_string(),
            String::new(),
            format!("{} templates available:", self.templates.len()),
        ];

        for template in &self.templates {
            parts.push(format!("- {} ({})", template.name, template.description));
        }

        parts.push(String::new());
        parts.push("=".repeat(50));
        parts.push(
            "CRITICAL: Libraries are ALREADY loaded - DON'T add <script> or <link> tags!"
                .to_string(),
        );
        parts.push("- Use L.map('elementId') for maps (Leaflet ready)".to_string());
        parts.push("- Use new Chart(ctx, config) for charts (Chart.js ready)".to_string());
        parts.push(
            "- Use Bootstrap classes like 'container', 'btn', 'card' (Bootstrap ready)"
                .to_string(),
        );
        parts.push(
            "- All templates include utility functions: createMap(), createChart(), showLoading()"
                .to_string(),
        );

        parts.join("\n")
    }
}
