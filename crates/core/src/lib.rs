//! Relief Forge Core
//!
//! Foundational types for the Relief Forge workspace: error types, agent
//! configuration, the data-source catalog view, the session context, the
//! generated page content model, and the research tool abstraction. This
//! crate has zero dependencies on application-level code (HTTP, LLM
//! providers, analyzers).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `config` - Per-execution tunables (`AgentConfig`)
//! - `catalog` - Read-only data source / template catalogs and their rendered references
//! - `context` - Session context and implementation plan (`SessionContext`, `ImplementationPlan`)
//! - `content` - Generated page content model (`PageContent`)
//! - `tool` - Research tool abstraction (`ResearchTool`, `ToolOutput`, `ToolRegistry`)

pub mod catalog;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod tool;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Configuration ──────────────────────────────────────────────────────
pub use config::AgentConfig;

// ── Catalogs ───────────────────────────────────────────────────────────
pub use catalog::{DataSourceInfo, SourceCatalog, SourceKind, TemplateCatalog, TemplateInfo};

// ── Session Context ────────────────────────────────────────────────────
pub use context::{
    ActionRecord, ImplementationPlan, ReasoningRecord, SessionContext, ToolRecord,
};

// ── Page Content ───────────────────────────────────────────────────────
pub use content::PageContent;

// ── Tool Abstraction ───────────────────────────────────────────────────
pub use tool::{names as tool_names, ResearchTool, ToolOutput, ToolRegistry};
