//! Agent Layer
//!
//! The REACT orchestration loop and its supporting pieces: decision
//! decoding, prompt construction, context digests, and the validation
//! repair agent.

pub mod decision;
pub mod digest;
pub mod prompts;
pub mod react;
pub mod repair;

pub use decision::{decode_decision, normalize_parameters, Decision};
pub use react::{ExecutionReport, ReactAgent};
pub use repair::{build_issues_context, Improvements, RepairAgent, RepairOutcome};
