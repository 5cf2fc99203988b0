//! JavaScript Analyzer
//!
//! Character-level and regex checks over the generated script: delimiter
//! balance, a missing-semicolon heuristic, library usage (Chart.js context
//! setup, jQuery, duplicate loads of pre-loaded libraries), and fetch calls
//! with no error handling. High severity when more than 2 issues are found.

use regex::Regex;

use crate::models::AnalyzerReport;

/// Analyze JavaScript content and return the issues found.
pub fn analyze_script(js: &str) -> AnalyzerReport {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    issues.extend(check_basic_syntax(js));

    let (library_issues, library_suggestions) = check_library_usage(js);
    issues.extend(library_issues);
    suggestions.extend(library_suggestions);

    issues.extend(check_common_errors(js));

    AnalyzerReport::new(issues, suggestions, 2)
}

/// Delimiter balance and the missing-semicolon heuristic.
fn check_basic_syntax(js: &str) -> Vec<String> {
    let mut issues = Vec::new();

    let balances = [
        ('{', '}', "braces"),
        ('[', ']', "brackets"),
        ('(', ')', "parentheses"),
    ];
    for (open, close, label) in balances {
        let diff =
            js.matches(open).count() as i64 - js.matches(close).count() as i64;
        if diff != 0 {
            let side = if diff > 0 { "opening" } else { "closing" };
            issues.push(format!(
                "Unmatched {}: {} {} {}",
                label,
                diff.unsigned_abs(),
                side,
                label
            ));
        }
    }

    let statement_re = Regex::new(r"(var|let|const|return)\s+").unwrap();
    for (i, raw_line) in js.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let ends_clean = line.ends_with(';')
            || line.ends_with('{')
            || line.ends_with('}')
            || line.ends_with(')')
            || line.ends_with(']');
        let is_comment =
            line.starts_with('*') || line.starts_with("//") || line.starts_with("/*");
        if !ends_clean && !is_comment && statement_re.is_match(line) {
            issues.push(format!("Line {}: Possible missing semicolon", i + 1));
        }
    }

    issues
}

/// Library usage checks: Leaflet ids, Chart.js context, jQuery, duplicate
/// script loads.
fn check_library_usage(js: &str) -> (Vec<String>, Vec<String>) {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if js.contains("L.") {
        let map_re = Regex::new(r#"L\.map\s*\(\s*['"]([^'"]+)['"]"#).unwrap();
        for caps in map_re.captures_iter(js) {
            suggestions.push(format!(
                "Ensure element with ID '{}' exists for Leaflet map",
                &caps[1]
            ));
        }
    }

    if js.contains("new Chart") {
        let context_re = Regex::new(r#"getContext\s*\(\s*['"]2d['"]"#).unwrap();
        if !context_re.is_match(js) {
            issues.push("Chart.js usage found but missing canvas context setup".to_string());
            suggestions.push(
                "Add: const ctx = document.getElementById('chartId').getContext('2d');"
                    .to_string(),
            );
        }
    }

    if js.contains("$(") || js.contains("jQuery") {
        issues.push(
            "jQuery usage detected - Bootstrap and vanilla JS should be sufficient".to_string(),
        );
        suggestions.push("Use vanilla JavaScript or Bootstrap JS instead of jQuery".to_string());
    }

    let preloaded = ["leaflet", "chart.js", "bootstrap"];
    if js.contains("<script") && preloaded.iter().any(|lib| js.contains(lib)) {
        issues.push("Attempting to load libraries that are already pre-loaded".to_string());
        suggestions
            .push("Remove <script> tags - libraries are already loaded in templates".to_string());
    }

    (issues, suggestions)
}

/// Obvious runtime mistakes: logging undefined, fetch without error handling.
fn check_common_errors(js: &str) -> Vec<String> {
    let mut issues = Vec::new();

    let undefined_re = Regex::new(r"\bconsole\.log\s*\(\s*[^)]*undefined[^)]*\)").unwrap();
    if undefined_re.is_match(js) {
        issues.push("Logging undefined variables detected".to_string());
    }

    let fetch_re = Regex::new(r"fetch\s*\([^)]+\)").unwrap();
    if fetch_re.is_match(js) && !js.contains(".catch") && !js.contains("try") {
        issues.push("fetch() calls without error handling detected".to_string());
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[test]
    fn test_clean_script() {
        let js = "const map = L.map('map');\ntry {\n    fetch('https://api.example.org/data').then(r => r.json());\n} catch (e) {\n    console.error(e);\n}";
        let report = analyze_script(js);
        assert!(report.issues.is_empty());
        assert_eq!(report.severity, Severity::Low);
    }

    #[test]
    fn test_three_unmatched_opening_braces() {
        let js = "function a() { if (x) { while (y) { const z = 1;";
        let report = analyze_script(js);
        assert!(report
            .issues
            .contains(&"Unmatched braces: 3 opening braces".to_string()));
    }

    #[test]
    fn test_unmatched_closing_parens() {
        let js = "doThing());";
        let report = analyze_script(js);
        assert!(report
            .issues
            .contains(&"Unmatched parentheses: 1 closing parentheses".to_string()));
    }

    #[test]
    fn test_missing_semicolon_heuristic() {
        let js = "const total = 5\nlet name = 'x';";
        let report = analyze_script(js);
        assert!(report
            .issues
            .contains(&"Line 1: Possible missing semicolon".to_string()));
        assert_eq!(
            report
                .issues
                .iter()
                .filter(|i| i.contains("semicolon"))
                .count(),
            1
        );
    }

    #[test]
    fn test_comment_lines_are_not_semicolon_flagged() {
        let js = "// const x = 1\n/* let y = 2 */";
        let report = analyze_script(js);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_chart_without_context_setup() {
        let js = "const chart = new Chart(canvas, config);";
        let report = analyze_script(js);
        assert!(report
            .issues
            .contains(&"Chart.js usage found but missing canvas context setup".to_string()));
    }

    #[test]
    fn test_jquery_is_discouraged() {
        let js = "$('#map').show();";
        let report = analyze_script(js);
        assert!(report.issues.iter().any(|i| i.contains("jQuery")));
    }

    #[test]
    fn test_duplicate_library_load() {
        let js = "document.head.innerHTML += '<script src=\"https://unpkg.com/leaflet/dist/leaflet.js\"></scr' + 'ipt>';";
        let report = analyze_script(js);
        assert!(report
            .issues
            .contains(&"Attempting to load libraries that are already pre-loaded".to_string()));
    }

    #[test]
    fn test_fetch_without_error_handling() {
        let js = "fetch('https://api.example.org/data').then(r => r.json());";
        let report = analyze_script(js);
        assert!(report
            .issues
            .contains(&"fetch() calls without error handling detected".to_string()));
    }

    #[test]
    fn test_fetch_with_catch_passes() {
        let js = "fetch('https://api.example.org/data').then(r => r.json()).catch(e => console.error(e));";
        let report = analyze_script(js);
        assert!(!report
            .issues
            .iter()
            .any(|i| i.contains("error handling")));
    }

    #[test]
    fn test_leaflet_map_id_suggestion() {
        let js = "const map = L.map('cityMap');";
        let report = analyze_script(js);
        assert!(report
            .suggestions
            .contains(&"Ensure element with ID 'cityMap' exists for Leaflet map".to_string()));
    }

    #[test]
    fn test_severity_high_above_two_issues() {
        let js = "$(x)\nnew Chart(c)\nfetch('https://api.example.org/d')";
        let report = analyze_script(js);
        assert!(report.issues.len() > 2);
        assert_eq!(report.severity, Severity::High);
    }
}
