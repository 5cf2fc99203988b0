//! Relief Forge CLI
//!
//! Thin caller around the REACT agent: reads the request from the command
//! line, wires the collaborators from settings and environment, runs one
//! execution, and prints the JSON report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use relief_forge::core::{SourceCatalog, TemplateCatalog};
use relief_forge::llm::{LlmClient, OpenAiClient, ProviderConfig};
use relief_forge::tools::{registry_with_search, WebSearchService};
use relief_forge::{MemorySessionLog, ReactAgent, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("relief_forge=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        bail!("usage: relief-forge <request text>\n       RELIEF_FORGE_CONFIG=path/to/settings.toml to override settings");
    }
    let user_request = args.join(" ");

    let settings_path = std::env::var("RELIEF_FORGE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("relief-forge.toml"));
    let settings = Settings::load(&settings_path).context("loading settings")?;

    let api_key = std::env::var(&settings.llm.api_key_env)
        .with_context(|| format!("{} is not set", settings.llm.api_key_env))?;
    let mut provider_config = ProviderConfig::new(settings.llm.model.clone()).with_api_key(api_key);
    if let Some(base_url) = settings.llm.base_url.clone() {
        provider_config = provider_config.with_base_url(base_url);
    }
    let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(provider_config));

    let sources = SourceCatalog::new(settings.data_sources.clone());
    let templates = TemplateCatalog::new(settings.templates.clone());

    let search = if settings.agent.enable_web_search {
        let api_key = settings
            .search
            .api_key_env
            .as_ref()
            .and_then(|env| std::env::var(env).ok());
        let timeout = Duration::from_secs(settings.agent.tool_timeout_secs);
        Some(
            WebSearchService::new(&settings.search.provider, api_key.as_deref(), timeout)
                .map_err(anyhow::Error::msg)
                .context("configuring web search")?,
        )
    } else {
        None
    };
    let registry = registry_with_search(&settings.agent, sources.clone(), search);

    let log = Arc::new(MemorySessionLog::new());
    let mut agent = ReactAgent::new(
        settings.agent.clone(),
        llm,
        registry,
        &sources,
        &templates,
        log,
    );

    let report = agent.execute(&user_request).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.success {
        Ok(())
    } else {
        bail!("execution failed")
    }
}
