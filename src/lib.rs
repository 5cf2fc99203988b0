//! Relief Forge
//!
//! Turns a natural-language disaster-response request into generated,
//! self-contained HTML/CSS/JS page content. The core is a Reason-Act-Observe
//! loop that plans, researches through tools, accumulates context, asks a
//! model to synthesize the page, and runs the result through a
//! validation-and-repair pipeline before returning a structured report.
//!
//! ## Workspace
//!
//! - `relief-forge-core` - errors, config, catalogs, session context, tool abstraction
//! - `relief-forge-llm` - model client trait, OpenAI implementation, response decoding
//! - `relief-forge-tools` - the four research tools and the default registry
//! - `relief-forge-quality-gates` - static analyzers and the validation pipeline
//! - this crate - the REACT loop, repair agent, session log, settings, CLI

pub mod agent;
pub mod session;
pub mod settings;

pub use agent::{ExecutionReport, ReactAgent, RepairAgent, RepairOutcome};
pub use session::{LogEntry, MemorySessionLog, MessageKind, NoopSessionLog, SessionLog};
pub use settings::Settings;

// Re-export the workspace crates under stable names
pub use relief_forge_core as core;
pub use relief_forge_llm as llm;
pub use relief_forge_quality_gates as quality_gates;
pub use relief_forge_tools as tools;
