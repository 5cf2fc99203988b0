//! Dependency Checker
//!
//! Cross-file consistency checks: duplicate imports of the pre-loaded
//! libraries, element ids referenced from JavaScript that do not exist in
//! the HTML, and Bootstrap class usage without Bootstrap being loaded.
//! High severity when more than 2 issues are found.

use std::collections::HashSet;

use regex::Regex;

use crate::models::AnalyzerReport;

/// Bootstrap class fragments that indicate Bootstrap styling is in use.
const BOOTSTRAP_CLASSES: [&str; 8] = [
    "container", "row", "col-", "btn", "card", "navbar", "alert", "modal",
];

/// Check dependencies across HTML, CSS, and JS.
pub fn analyze_dependencies(html: &str, css: &str, js: &str) -> AnalyzerReport {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    let full_content = format!("{}{}{}", html, css, js);

    for lib in find_duplicate_libraries(&find_library_imports(&full_content)) {
        issues.push(format!("Duplicate import of {} detected", lib));
        suggestions.push(format!(
            "Remove duplicate {} imports - library is pre-loaded",
            lib
        ));
    }

    for element_id in missing_elements(&find_element_references(js), html) {
        issues.push(format!(
            "JavaScript references element '{}' but element not found in HTML",
            element_id
        ));
        suggestions.push(format!("Add element with id='{}' to HTML", element_id));
    }

    if uses_bootstrap_classes(html) && !full_content.to_lowercase().contains("bootstrap") {
        issues.push("Bootstrap CSS classes used but Bootstrap not detected".to_string());
        suggestions.push(
            "Bootstrap is pre-loaded - ensure template is being used correctly".to_string(),
        );
    }

    AnalyzerReport::new(issues, suggestions, 2)
}

/// All script/link import URLs in the content.
fn find_library_imports(content: &str) -> Vec<String> {
    let mut imports = Vec::new();

    let script_re = Regex::new(r#"(?i)<script[^>]*src=['"]([^'"]+)['"]"#).unwrap();
    for caps in script_re.captures_iter(content) {
        imports.push(caps[1].to_string());
    }

    let link_re = Regex::new(r#"(?i)<link[^>]*href=['"]([^'"]+)['"]"#).unwrap();
    for caps in link_re.captures_iter(content) {
        imports.push(caps[1].to_string());
    }

    imports
}

/// Known libraries imported more than once, identified by URL substring.
fn find_duplicate_libraries(imports: &[String]) -> Vec<&'static str> {
    let mut seen: HashSet<&'static str> = HashSet::new();
    let mut duplicates = Vec::new();

    for import_url in imports {
        if let Some(lib) = known_library_name(import_url) {
            if !seen.insert(lib) && !duplicates.contains(&lib) {
                duplicates.push(lib);
            }
        }
    }

    duplicates
}

/// Map an import URL to one of the known pre-loaded libraries.
fn known_library_name(url: &str) -> Option<&'static str> {
    let url_lower = url.to_lowercase();
    if url_lower.contains("leaflet") {
        Some("Leaflet")
    } else if url_lower.contains("chart") {
        Some("Chart.js")
    } else if url_lower.contains("bootstrap") {
        Some("Bootstrap")
    } else if url_lower.contains("font-awesome") || url_lower.contains("fontawesome") {
        Some("Font Awesome")
    } else {
        None
    }
}

/// Element ids referenced from JavaScript, deduplicated in first-seen order.
fn find_element_references(js: &str) -> Vec<String> {
    let patterns = [
        r#"getElementById\s*\(\s*['"]([^'"]+)['"]"#,
        r#"L\.map\s*\(\s*['"]([^'"]+)['"]"#,
        r##"querySelector\s*\(\s*['"]#([^'"]+)['"]"##,
    ];

    let mut seen: HashSet<String> = HashSet::new();
    let mut ids = Vec::new();

    for pattern in patterns {
        let re = Regex::new(pattern).unwrap();
        for caps in re.captures_iter(js) {
            let id = caps[1].to_string();
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
    }

    ids
}

/// Referenced ids with no matching element in the HTML.
fn missing_elements(element_ids: &[String], html: &str) -> Vec<String> {
    element_ids
        .iter()
        .filter(|id| {
            !Regex::new(&format!(r#"id=['"]?{}['"]?"#, regex::escape(id)))
                .unwrap()
                .is_match(html)
        })
        .cloned()
        .collect()
}

/// Whether the HTML uses Bootstrap class names.
fn uses_bootstrap_classes(html: &str) -> bool {
    BOOTSTRAP_CLASSES.iter().any(|cls| html.contains(cls))
}
