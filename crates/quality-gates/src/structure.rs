//! HTML Structure Analyzer
//!
//! Regex-based checks over the assembled document: required document tags,
//! element ids referenced by Leaflet maps and Chart.js canvases, Bootstrap
//! container usage, and a stack-based tag-balance scan for likely unclosed
//! tags. High severity when more than 3 issues are found.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::models::AnalyzerReport;

/// Tags that never take a closing counterpart.
const VOID_ELEMENTS: [&str; 6] = ["img", "br", "hr", "meta", "link", "input"];

/// Analyze HTML structure and return the issues found.
pub fn analyze_structure(html: &str) -> AnalyzerReport {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if !Regex::new(r"(?i)<html[^>]*>").unwrap().is_match(html) {
        issues.push("Missing <html> tag".to_string());
        suggestions.push("Add proper HTML document structure".to_string());
    }

    let head_re = RegexBuilder::new(r"<head[^>]*>.*?</head>")
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .unwrap();
    if !head_re.is_match(html) {
        issues.push("Missing or empty <head> section".to_string());
        suggestions.push("Add <head> with meta tags and title".to_string());
    }

    let body_re = RegexBuilder::new(r"<body[^>]*>.*?</body>")
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .unwrap();
    if !body_re.is_match(html) {
        issues.push("Missing or empty <body> section".to_string());
        suggestions.push("Add <body> with content".to_string());
    }

    // Every Leaflet map must have a matching element id
    let map_re = Regex::new(r#"L\.map\(['"]([^'"]+)['"]"#).unwrap();
    for caps in map_re.captures_iter(html) {
        let map_id = &caps[1];
        if !element_id_exists(html, map_id) {
            issues.push(format!(
                "Leaflet map references element '{}' but no element with that ID exists",
                map_id
            ));
            suggestions.push(format!("Add <div id='{}'></div> for the map", map_id));
        }
    }

    // Every 2d canvas context must have a matching canvas element
    let chart_re =
        Regex::new(r#"getElementById\(['"]([^'"]+)['"].*?getContext\(['"]2d['"]"#).unwrap();
    for caps in chart_re.captures_iter(html) {
        let chart_id = &caps[1];
        let canvas_re = Regex::new(&format!(
            r#"<canvas[^>]*id=['"]?{}['"]?"#,
            regex::escape(chart_id)
        ))
        .unwrap();
        if !canvas_re.is_match(html) {
            issues.push(format!(
                "Chart.js references canvas '{}' but no canvas element with that ID exists",
                chart_id
            ));
            suggestions.push(format!("Add <canvas id='{}'></canvas> for the chart", chart_id));
        }
    }

    // Bootstrap usage without a container wrapper
    if html.contains("class=") && html.to_lowercase().contains("bootstrap") {
        let container_re =
            Regex::new(r#"class=['"][^'"]*(container|container-fluid)[^'"]"#).unwrap();
        if !container_re.is_match(html) {
            issues.push("Using Bootstrap but missing container structure".to_string());
            suggestions
                .push("Wrap content in Bootstrap container: <div class='container'>".to_string());
        }
    }

    for tag in find_unclosed_tags(html) {
        issues.push(format!("Potentially unclosed tag: {}", tag));
        suggestions.push(format!("Ensure {} tags are properly closed", tag));
    }

    AnalyzerReport::new(issues, suggestions, 3)
}

/// Whether any element carries the given id.
fn element_id_exists(html: &str, id: &str) -> bool {
    Regex::new(&format!(r#"id=['"]?{}['"]?"#, regex::escape(id)))
        .unwrap()
        .is_match(html)
}

/// Stack-based scan for likely unclosed tags. A simplified check, not a
/// full parser: mismatched closing tags and leftover opens both count.
fn find_unclosed_tags(html: &str) -> Vec<String> {
    let tag_re = Regex::new(r"<(/?)(\w+)[^>]*>").unwrap();

    let mut stack: Vec<String> = Vec::new();
    let mut unclosed: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for caps in tag_re.captures_iter(html) {
        let is_closing = !caps[1].is_empty();
        let tag_name = caps[2].to_lowercase();

        if VOID_ELEMENTS.contains(&tag_name.as_str()) {
            continue;
        }

        if is_closing {
            if stack.last() == Some(&tag_name) {
                stack.pop();
            } else if seen.insert(tag_name.clone()) {
                unclosed.push(tag_name);
            }
        } else {
            stack.push(tag_name);
        }
    }

    for tag_name in stack {
        if seen.insert(tag_name.clone()) {
            unclosed.push(tag_name);
        }
    }

    unclosed
}
