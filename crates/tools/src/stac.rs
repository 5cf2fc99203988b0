//! STAC Sample Fetch
//!
//! Pulls a handful of items from a collection of the configured search
//! catalog so the agent can see the real data structure (geometry types,
//! property names) before generating code against it.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use relief_forge_core::{ResearchTool, SourceCatalog, ToolOutput};
use relief_forge_llm::build_http_client;

/// The `fetch_stac_sample_data` research tool.
pub struct StacSampleTool {
    catalog: SourceCatalog,
    client: reqwest::Client,
}

impl StacSampleTool {
    pub fn new(catalog: SourceCatalog, timeout: Duration) -> Self {
        Self {
            catalog,
            client: build_http_client(timeout),
        }
    }
}

#[async_trait]
impl ResearchTool for StacSampleTool {
    fn name(&self) -> &str {
        relief_forge_core::tool_names::FETCH_STAC_SAMPLE_DATA
    }

    fn description(&self) -> &str {
        "Fetch sample data from a STAC catalog collection to understand data structure and availability."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "collection": {
                "type": "string",
                "description": "STAC collection ID (e.g. 'gdacs-events', 'emdat-impacts')"
            },
            "bbox": {
                "type": "array",
                "description": "Bounding box [west, south, east, north] for geographic filtering",
                "items": { "type": "number" },
                "minItems": 4,
                "maxItems": 4
            },
            "limit": {
                "type": "integer",
                "description": "Number of items to fetch (default: 5, max: 20)",
                "minimum": 1,
                "maximum": 20
            }
        })
    }

    async fn execute(&self, parameters: &Value) -> ToolOutput {
        let collection = match parameters.get("collection").and_then(|v| v.as_str()) {
            Some(c) => c.to_string(),
            None => return ToolOutput::err("Missing required parameter: collection"),
        };
        let limit = parameters
            .get("limit")
            .and_then(|v| v.as_u64())
            .unwrap_or(5)
            .clamp(1, 20);

        let bbox = match parse_bbox(parameters.get("bbox")) {
            Ok(b) => b,
            Err(e) => return ToolOutput::err(e).with("collection", collection),
        };

        let Some(source) = self.catalog.first_search_catalog() else {
            return ToolOutput::err("No active STAC catalogs configured");
        };
        let Some(search_url) = source.search_url() else {
            return ToolOutput::err("STAC search URL not available");
        };

        let query = build_search_query(&collection, limit, bbox.as_deref());

        let response = match self.client.get(search_url).query(&query).send().await {
            Ok(r) => r,
            Err(err) if err.is_timeout() => {
                return ToolOutput::err("Request timeout").with("collection", collection)
            }
            Err(err) => return ToolOutput::err(err.to_string()).with("collection", collection),
        };

        let status = response.status().as_u16();
        if status != 200 {
            return ToolOutput::err(format!("STAC API returned {}", status))
                .with("collection", collection);
        }

        let data: Value = match response.json().await {
            Ok(d) => d,
            Err(err) => {
                return ToolOutput::err(format!("Invalid STAC response: {}", err))
                    .with("collection", collection)
            }
        };

        let features = data
            .get("features")
            .and_then(|f| f.as_array())
            .cloned()
            .unwrap_or_default();

        ToolOutput::ok()
            .with("collection", collection)
            .with("search_url", search_url)
            .with("total_found", features.len())
            .with("bbox_used", bbox.map(Value::from).unwrap_or(Value::Null))
            .with("sample_features", summarize_features(&features))
            .with("available_properties", first_feature_properties(&features))
    }
}

/// Validate an optional bbox parameter: exactly 4 numbers or nothing.
fn parse_bbox(raw: Option<&Value>) -> Result<Option<Vec<f64>>, String> {
    let Some(value) = raw else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    let items = value
        .as_array()
        .ok_or_else(|| "bbox must be an array of numbers".to_string())?;
    if items.len() != 4 {
        return Err("bbox must contain exactly 4 numbers: west,south,east,north".to_string());
    }
    items
        .iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| "bbox values must be numbers".to_string())
        })
        .collect::<Result<Vec<f64>, String>>()
        .map(Some)
}

/// Build the item search query string pairs.
fn build_search_query(collection: &str, limit: u64, bbox: Option<&[f64]>) -> Vec<(String, String)> {
    let mut query = vec![
        ("collections".to_string(), collection.to_string()),
        ("limit".to_string(), limit.to_string()),
    ];
    if let Some(bbox) = bbox {
        let joined = bbox
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        query.push(("bbox".to_string(), joined));
    }
    query
}

/// Reduce features to the sample shape the agent consumes: at most 3 items,
/// each with its id, geometry type, and first 5 properties.
fn summarize_features(features: &[Value]) -> Vec<Value> {
    features
        .iter()
        .take(3)
        .map(|feature| {
            let properties: serde_json::Map<String, Value> = feature
                .get("properties")
                .and_then(|p| p.as_object())
                .map(|map| {
                    map.iter()
                        .take(5)
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                })
                .unwrap_or_default();

            serde_json::json!({
                "id": feature.get("id").cloned().unwrap_or(Value::Null),
                "geometry_type": feature
                    .get("geometry")
                    .and_then(|g| g.get("type"))
                    .cloned()
                    .unwrap_or(Value::Null),
                "properties": properties,
            })
        })
        .collect()
}

/// All property keys of the first feature, if any.
fn first_feature_properties(features: &[Value]) -> Vec<String> {
    features
        .first()
        .and_then(|f| f.get("properties"))
        .and_then(|p| p.as_object())
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}
