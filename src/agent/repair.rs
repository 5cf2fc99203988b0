//! Repair Agent
//!
//! Takes validated content with issues and asks the model to fix only the
//! reported problems, keeping everything else intact. A fix is accepted only
//! when it strictly reduces the issue count; otherwise the still-imperfect
//! output becomes the baseline for the next attempt, up to a fixed cap.
//! Repair calls use their own attempt budget and do not consume the loop's
//! model-call budget.

use std::sync::Arc;

use serde::Serialize;

use relief_forge_core::PageContent;
use relief_forge_llm::{parse_json_response, CompletionRequest, LlmClient};
use relief_forge_quality_gates::{ValidationPipeline, ValidationReport};

use crate::session::{MessageKind, SessionLog};

/// Maximum model-backed fix attempts per repair run.
const MAX_FIX_ATTEMPTS: u32 = 2;

/// What a repair run changed.
#[derive(Debug, Clone, Serialize)]
pub struct Improvements {
    /// Issues removed relative to the original validation
    pub issues_fixed: i64,
    /// Issue count before repair
    pub original_issues: usize,
    /// Issue count after repair
    pub remaining_issues: usize,
    /// Whether the severity classification changed
    pub severity_improved: bool,
    /// Severity before repair
    pub original_severity: relief_forge_quality_gates::Severity,
    /// Severity after repair
    pub final_severity: relief_forge_quality_gates::Severity,
}

/// Result of one repair run.
#[derive(Debug, Clone, Serialize)]
pub struct RepairOutcome {
    /// Whether a fix was accepted
    pub content_fixed: bool,
    /// The content to use going forward (fixed, or the input unchanged)
    pub content: PageContent,
    /// Validation of the input content
    pub original_validation: ValidationReport,
    /// Validation of the returned content
    pub final_validation: ValidationReport,
    /// Improvement summary when a fix was accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Improvements>,
    /// Human-readable outcome
    pub message: String,
}

/// Model-backed repair over the validation pipeline.
pub struct RepairAgent {
    llm: Arc<dyn LlmClient>,
    pipeline: ValidationPipeline,
    log: Arc<dyn SessionLog>,
    max_tokens: u32,
}

impl RepairAgent {
    /// Create a repair agent.
    pub fn new(llm: Arc<dyn LlmClient>, log: Arc<dyn SessionLog>, max_tokens: u32) -> Self {
        Self {
            llm,
            pipeline: ValidationPipeline::new(),
            log,
            max_tokens,
        }
    }

    /// Validate content without attempting fixes.
    pub fn validate_only(&self, content: &PageContent) -> ValidationReport {
        self.pipeline.validate(content)
    }

    /// Validate content and attempt bounded fixes if needed.
    pub async fn validate_and_fix(&self, content: &PageContent) -> RepairOutcome {
        let original_validation = self.pipeline.validate(content);

        if !original_validation.needs_fixing {
            return RepairOutcome {
                content_fixed: false,
                content: content.clone(),
                final_validation: original_validation.clone(),
                original_validation,
                improvements: None,
                message: "Content passed all validations".to_string(),
            };
        }

        tracing::info!(
            issues = original_validation.total_issues,
            "content has issues, attempting fixes"
        );

        let mut baseline_content = content.clone();
        let mut baseline_validation = original_validation.clone();

        for attempt in 1..=MAX_FIX_ATTEMPTS {
            let fixed = match self
                .generate_fixes(&baseline_content, &baseline_validation, attempt)
                .await
            {
                Some(fixed) => fixed,
                None => continue,
            };

            let revalidation = self.pipeline.validate(&fixed);
            if revalidation.total_issues < baseline_validation.total_issues {
                let improvements = Improvements {
                    issues_fixed: original_validation.total_issues as i64
                        - revalidation.total_issues as i64,
                    original_issues: original_validation.total_issues,
                    remaining_issues: revalidation.total_issues,
                    severity_improved: original_validation.overall_severity
                        != revalidation.overall_severity,
                    original_severity: original_validation.overall_severity,
                    final_severity: revalidation.overall_severity,
                };
                let message = format!(
                    "Fixed {} issues",
                    original_validation.total_issues - revalidation.total_issues
                );
                return RepairOutcome {
                    content_fixed: true,
                    content: fixed,
                    original_validation,
                    final_validation: revalidation,
                    improvements: Some(improvements),
                    message,
                };
            }

            // No progress: the still-imperfect output becomes the next baseline
            baseline_validation = revalidation;
            baseline_content = fixed;
        }

        RepairOutcome {
            content_fixed: false,
            content: content.clone(),
            final_validation: original_validation.clone(),
            message: format!(
                "Found {} issues but could not auto-fix",
                original_validation.total_issues
            ),
            original_validation,
            improvements: None,
        }
    }

    /// Ask the model to fix the reported issues. Returns None when the call
    /// or the response decoding fails; the caller moves to the next attempt.
    async fn generate_fixes(
        &self,
        content: &PageContent,
        validation: &ValidationReport,
        attempt: u32,
    ) -> Option<PageContent> {
        let issues_context = build_issues_context(validation);
        let content_json = serde_json::to_string_pretty(content).ok()?;

        let system = r#"You are an expert HTML/JavaScript validator and fixer. You receive code with identified issues and must fix them while preserving the original functionality and intent.

CRITICAL RULES:
1. Fix ONLY the specific issues mentioned - don't change working code
2. Maintain the exact same JSON structure in your response
3. Preserve all working functionality and styling
4. Libraries are PRE-LOADED: Leaflet, Chart.js, Bootstrap, Font Awesome
5. Don't add <script> or <link> tags for pre-loaded libraries

COMMON FIXES:
- Add missing HTML elements (divs with IDs, canvas elements)
- Fix JavaScript syntax errors (missing semicolons, braces)
- Ensure element IDs match JavaScript references
- Remove duplicate library imports
- Fix unclosed HTML tags

Return the EXACT same JSON structure with fixes applied:
{
  "title": "...",
  "description": "...",
  "main_content": "...",
  "custom_css": "...",
  "custom_js": "..."
}"#;

        let user = format!(
            r#"Fix the following issues in this HTML/JavaScript content:

ISSUES TO FIX (Attempt {attempt}):
{issues_context}

CURRENT CONTENT:
{content_json}

Please fix these specific issues while keeping everything else exactly the same. Focus on the most critical issues first."#
        );

        let request = CompletionRequest::new(system, user, 0.1, self.max_tokens);
        let raw = match self.llm.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(attempt, error = %e, "fix attempt failed");
                return None;
            }
        };

        let mut fixed: PageContent = match parse_json_response(&raw) {
            Ok(fixed) => fixed,
            Err(e) => {
                tracing::error!(attempt, error = %e, "fix response could not be decoded");
                return None;
            }
        };

        // Fields the model dropped keep their previous value
        fixed.fill_missing_from(content);

        self.log.append(
            MessageKind::Agent,
            &format!("Generated fix attempt {}", attempt),
            serde_json::json!({ "attempt": attempt }),
        );

        Some(fixed)
    }
}

/// Build the grouped, capped issues digest for the fix prompt.
pub fn build_issues_context(validation: &ValidationReport) -> String {
    if validation.total_issues == 0 {
        return "No issues found.".to_string();
    }

    let mut parts = vec![
        format!(
            "Found {} issues (Severity: {}):",
            validation.total_issues, validation.overall_severity
        ),
        String::new(),
    ];

    let groups = [
        ("HTML STRUCTURE ISSUES:", &validation.detailed_results.structure),
        ("JAVASCRIPT ISSUES:", &validation.detailed_results.script),
        ("DEPENDENCY ISSUES:", &validation.detailed_results.dependencies),
    ];
    for (heading, report) in groups {
        if report.issues.is_empty() {
            continue;
        }
        parts.push(heading.to_string());
        for issue in report.issues.iter().take(5) {
            parts.push(format!("  - {}", issue));
        }
        parts.push(String::new());
    }

    if !validation.suggestions.is_empty() {
        parts.push("SUGGESTED FIXES:".to_string());
        for suggestion in validation.suggestions.iter().take(10) {
            parts.push(format!("  -> {}", suggestion));
        }
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_forge_quality_gates::{AnalyzerReport, Severity};

    #[test]
    fn test_issues_context_groups_by_analyzer() {
        let report = ValidationReport::aggregate(
            AnalyzerReport::new(vec!["Missing <html> tag".to_string()], vec![], 3),
            AnalyzerReport::new(
                vec!["Unmatched braces: 1 opening braces".to_string()],
                vec!["Balance the braces".to_string()],
                2,
            ),
            AnalyzerReport::clean(),
        );

        let context = build_issues_context(&report);
        assert!(context.starts_with("Found 2 issues (Severity: medium):"));
        assert!(context.contains("HTML STRUCTURE ISSUES:\n  - Missing <html> tag"));
        assert!(context.contains("JAVASCRIPT ISSUES:\n  - Unmatched braces: 1 opening braces"));
        assert!(!context.contains("DEPENDENCY ISSUES:"));
        assert!(context.contains("SUGGESTED FIXES:\n  -> Balance the braces"));
    }

    #[test]
    fn test_issues_context_caps_per_group() {
        let many: Vec<String> = (0..8).map(|i| format!("issue {}", i)).collect();
        let report = ValidationReport::aggregate(
            AnalyzerReport::new(many, vec![], 3),
            AnalyzerReport::clean(),
            AnalyzerReport::clean(),
        );
        let context = build_issues_context(&report);
        assert!(context.contains("issue 4"));
        assert!(!context.contains("issue 5"));
    }

    #[test]
    fn test_issues_context_clean_report() {
        let report = ValidationReport::aggregate(
            AnalyzerReport::clean(),
            AnalyzerReport::clean(),
            AnalyzerReport::clean(),
        );
        assert_eq!(build_issues_context(&report), "No issues found.");
        assert_eq!(report.overall_severity, Severity::Low);
    }
}
