//! Generated Page Content
//!
//! The five-field content structure produced by the generation step and
//! consumed by the validation pipeline. The page template the content lands
//! in already provides the document shell and pre-loaded libraries, so every
//! field is body-level material only.

use serde::{Deserialize, Serialize};

/// Content for one generated page.
///
/// Every field is serde-defaulted: a model response that omits a field
/// deserializes with an empty string rather than failing, and
/// [`PageContent::fill_missing_from`] lets callers backfill from a prior
/// version when a repair response drops fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageContent {
    /// Page title
    pub title: String,
    /// Short description of the page's purpose
    pub description: String,
    /// HTML body content (no html/head/body tags)
    pub main_content: String,
    /// CSS rules (no style tags)
    pub custom_css: String,
    /// JavaScript code (no script tags)
    pub custom_js: String,
}

impl PageContent {
    /// Replace any empty field with the corresponding field from `prior`.
    ///
    /// Model responses during repair or URL fixing sometimes drop fields;
    /// the contract is that missing fields keep their previous value.
    pub fn fill_missing_from(&mut self, prior: &PageContent) {
        if self.title.is_empty() {
            self.title = prior.title.clone();
        }
        if self.description.is_empty() {
            self.description = prior.description.clone();
        }
        if self.main_content.is_empty() {
            self.main_content = prior.main_content.clone();
        }
        if self.custom_css.is_empty() {
            self.custom_css = prior.custom_css.clone();
        }
        if self.custom_js.is_empty() {
            self.custom_js = prior.custom_js.clone();
        }
    }

    /// Combine the renderable parts into one blob for URL extraction.
    ///
    /// Order matters for line-number reporting: markup first, then the
    /// script and style wrappers.
    pub fn combined_markup(&self) -> String {
        let mut combined = String::new();
        if !self.main_content.is_empty() {
            combined.push_str(&self.main_content);
            combined.push('\n');
        }
        if !self.custom_js.is_empty() {
            combined.push_str("<script>");
            combined.push_str(&self.custom_js);
            combined.push_str("</script>\n");
        }
        if !self.custom_css.is_empty() {
            combined.push_str("<style>");
            combined.push_str(&self.custom_css);
            combined.push_str("</style>\n");
        }
        combined
    }
}
