//! Validation Pipeline
//!
//! Assembles one synthetic full HTML document from the five content fields,
//! runs the three analyzers, and aggregates their findings: issues and
//! suggestions concatenate in analyzer order, overall severity is the
//! maximum across analyzers, and `needs_fixing` is set whenever any issue
//! exists.

use relief_forge_core::PageContent;

use crate::dependencies::analyze_dependencies;
use crate::models::ValidationReport;
use crate::script::analyze_script;
use crate::structure::analyze_structure;

/// Orchestrates the three static analyzers over generated content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationPipeline;

impl ValidationPipeline {
    /// Create a pipeline.
    pub fn new() -> Self {
        Self
    }

    /// Run all analyzers over the content and aggregate the findings.
    pub fn validate(&self, content: &PageContent) -> ValidationReport {
        let full_html = assemble_document(content);

        let structure = analyze_structure(&full_html);
        let script = analyze_script(&content.custom_js);
        let dependencies = analyze_dependencies(
            &full_html,
            &content.custom_css,
            &content.custom_js,
        );

        let report = ValidationReport::aggregate(structure, script, dependencies);
        tracing::debug!(
            total_issues = report.total_issues,
            severity = %report.overall_severity,
            "content validation completed"
        );
        report
    }
}

/// Build the synthetic document the analyzers run against.
///
/// Mirrors the shell the content is injected into at render time, so id
/// lookups and tag-balance checks see the same document a browser would.
pub fn assemble_document(content: &PageContent) -> String {
    format!(
        "<html>\n<head>\n    <title>{}</title>\n    <style>{}</style>\n</head>\n<body>\n    {}\n    <script>{}</script>\n</body>\n</html>",
        content.title, content.custom_css, content.main_content, content.custom_js
    )
}
