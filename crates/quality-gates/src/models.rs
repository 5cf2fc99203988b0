//! Validation Models
//!
//! Data structures for the static analysis of generated page content:
//! per-analyzer reports, the aggregated validation report, and the severity
//! scale that drives the repair decision.

use serde::{Deserialize, Serialize};

/// How serious an analyzer's findings are.
///
/// Ordered so the pipeline can take the maximum across analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// No issues found
    Low,
    /// Some issues found
    Medium,
    /// Issue count crossed the analyzer's high-severity threshold
    High,
}

impl Severity {
    /// Classify an issue count against an analyzer's high threshold.
    ///
    /// `high_threshold` is exclusive: counts strictly above it are High.
    pub fn for_issue_count(count: usize, high_threshold: usize) -> Self {
        if count > high_threshold {
            Severity::High
        } else if count > 0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Findings from a single analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerReport {
    /// Issues found, in scan order
    pub issues: Vec<String>,
    /// Suggested fixes, parallel to the issues where applicable
    pub suggestions: Vec<String>,
    /// Severity classification for this analyzer's findings
    pub severity: Severity,
}

impl AnalyzerReport {
    /// Build a report, classifying severity from the issue count.
    pub fn new(issues: Vec<String>, suggestions: Vec<String>, high_threshold: usize) -> Self {
        let severity = Severity::for_issue_count(issues.len(), high_threshold);
        Self {
            issues,
            suggestions,
            severity,
        }
    }

    /// A clean report.
    pub fn clean() -> Self {
        Self {
            issues: Vec::new(),
            suggestions: Vec::new(),
            severity: Severity::Low,
        }
    }
}

/// Per-analyzer breakdown inside the aggregated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedReports {
    /// HTML structure findings
    pub structure: AnalyzerReport,
    /// JavaScript findings
    pub script: AnalyzerReport,
    /// Cross-file dependency findings
    pub dependencies: AnalyzerReport,
}

/// The aggregated validation result for one piece of generated content.
///
/// Recomputed wholesale every time validation runs; never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Maximum severity across the analyzers
    pub overall_severity: Severity,
    /// Total issue count across the analyzers
    pub total_issues: usize,
    /// All issues, concatenated in analyzer order
    pub issues: Vec<String>,
    /// All suggestions, concatenated in analyzer order
    pub suggestions: Vec<String>,
    /// Per-analyzer breakdown
    pub detailed_results: DetailedReports,
    /// Whether the repair agent should run
    pub needs_fixing: bool,
}

impl ValidationReport {
    /// Aggregate the three analyzer reports.
    pub fn aggregate(
        structure: AnalyzerReport,
        script: AnalyzerReport,
        dependencies: AnalyzerReport,
    ) -> Self {
        let mut issues = Vec::new();
        let mut suggestions = Vec::new();
        for report in [&structure, &script, &dependencies] {
            issues.extend(report.issues.iter().cloned());
            suggestions.extend(report.suggestions.iter().cloned());
        }

        let overall_severity = structure
            .severity
            .max(script.severity)
            .max(dependencies.severity);
        let total_issues = issues.len();

        Self {
            overall_severity,
            total_issues,
            issues,
            suggestions,
            detailed_results: DetailedReports {
                structure,
                script,
                dependencies,
            },
            needs_fixing: total_issues > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!(Severity::High.max(Severity::Low), Severity::High);
    }

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(Severity::for_issue_count(0, 3), Severity::Low);
        assert_eq!(Severity::for_issue_count(1, 3), Severity::Medium);
        assert_eq!(Severity::for_issue_count(3, 3), Severity::Medium);
        assert_eq!(Severity::for_issue_count(4, 3), Severity::High);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_aggregate_takes_max_severity() {
        let structure = AnalyzerReport::new(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec![],
            3,
        );
        let script = AnalyzerReport::clean();
        let dependencies = AnalyzerReport::clean();

        let report = ValidationReport::aggregate(structure, script, dependencies);
        assert_eq!(report.overall_severity, Severity::High);
        assert_eq!(report.total_issues, 4);
        assert!(report.needs_fixing);
    }

    #[test]
    fn test_aggregate_clean_reports() {
        let report = ValidationReport::aggregate(
            AnalyzerReport::clean(),
            AnalyzerReport::clean(),
            AnalyzerReport::clean(),
        );
        assert_eq!(report.overall_severity, Severity::Low);
        assert_eq!(report.total_issues, 0);
        assert!(!report.needs_fixing);
    }

    #[test]
    fn test_aggregate_concatenates_in_analyzer_order() {
        let structure = AnalyzerReport::new(vec!["html issue".into()], vec![], 3);
        let script = AnalyzerReport::new(vec!["js issue".into()], vec![], 2);
        let dependencies = AnalyzerReport::new(vec!["dep issue".into()], vec![], 2);

        let report = ValidationReport::aggregate(structure, script, dependencies);
        assert_eq!(report.issues, vec!["html issue", "js issue", "dep issue"]);
    }
}
