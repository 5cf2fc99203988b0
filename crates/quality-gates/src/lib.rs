//! Relief Forge Quality Gates
//!
//! Static analysis for generated page content:
//!
//! - `models` - severity scale, per-analyzer reports, aggregated validation report
//! - `structure` - HTML structure analyzer
//! - `script` - JavaScript analyzer
//! - `dependencies` - cross-file dependency checker
//! - `pipeline` - the orchestrator that assembles the document and aggregates findings
//!
//! This crate is LLM-free; the repair agent that acts on these reports lives
//! with the application.

pub mod dependencies;
pub mod models;
pub mod pipeline;
pub mod script;
pub mod structure;

// Re-export core model types
pub use models::{AnalyzerReport, DetailedReports, Severity, ValidationReport};

// Re-export analyzers and pipeline
pub use dependencies::analyze_dependencies;
pub use pipeline::{assemble_document, ValidationPipeline};
pub use script::analyze_script;
pub use structure::analyze_structure;
