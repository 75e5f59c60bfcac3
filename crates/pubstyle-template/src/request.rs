//! Request and result types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::{Citation, CrossReference, Equation};

/// How the request content should be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Markdown; headings start sections.
    #[default]
    Markdown,
    /// Plain text; the whole content is one section.
    Text,
    /// JSON object mapping section names to section text.
    Json,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markdown => "markdown",
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

fn default_template_type() -> String {
    "article".to_owned()
}

/// Content to format with a style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRequest {
    /// Key of the style to apply.
    #[serde(default, alias = "style")]
    pub style_key: String,
    /// Raw document content.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_type: ContentType,
    /// Template type (`article`, `conference_paper`, ...).
    #[serde(default = "default_template_type")]
    pub template_type: String,
    /// Per-request replacements for style defaults.
    #[serde(default)]
    pub overrides: BTreeMap<String, Value>,
}

impl TemplateRequest {
    /// Create a markdown `article` request without overrides.
    pub fn new(style_key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            style_key: style_key.into(),
            content: content.into(),
            content_type: ContentType::default(),
            template_type: default_template_type(),
            overrides: BTreeMap::new(),
        }
    }

    /// Add an override option.
    #[must_use]
    pub fn with_override(mut self, option: impl Into<String>, value: Value) -> Self {
        self.overrides.insert(option.into(), value);
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    #[must_use]
    pub fn with_template_type(mut self, template_type: impl Into<String>) -> Self {
        self.template_type = template_type.into();
        self
    }
}

/// Style attributes after overrides have been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleAttributes {
    pub font_family: String,
    pub font_size: String,
    pub line_spacing: f64,
    pub column_count: u32,
    pub page_size: String,
    pub citation_style: String,
}

/// One section of the processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedSection {
    /// Normalized section name, e.g. `methodology`.
    pub name: String,
    /// Display title, e.g. `Methodology`.
    pub title: String,
    pub content: String,
    pub word_count: usize,
    pub citations: Vec<Citation>,
    pub equations: Vec<Equation>,
    pub references: Vec<CrossReference>,
}

/// Table of contents entry, in template order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    pub section: String,
    pub title: String,
    /// 1-based position of the section in the template's section list.
    pub order: usize,
    pub word_count: usize,
}

/// Citations across the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationSummary {
    pub total_citations: usize,
    pub unique_citations: usize,
    pub citation_style: String,
    /// Distinct citation keys in first-use order (`3`, `Smith_2020`).
    pub keys: Vec<String>,
}

/// Section checks against the template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub missing_required: Vec<String>,
    pub unexpected_sections: Vec<String>,
}

/// Document counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentStatistics {
    pub total_words: usize,
    pub total_sections: usize,
    pub total_citations: usize,
    pub total_equations: usize,
    pub total_references: usize,
    pub section_breakdown: BTreeMap<String, usize>,
}

/// Content with a style fully applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateResult {
    pub style_key: String,
    pub template_type: String,
    pub attributes: StyleAttributes,
    pub sections: Vec<FormattedSection>,
    pub table_of_contents: Vec<TocEntry>,
    pub citations: CitationSummary,
    pub validation: SectionValidation,
    pub statistics: ContentStatistics,
    /// Override options that were not recognized.
    pub warnings: Vec<String>,
    pub processing_id: Uuid,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: TemplateRequest =
            serde_json::from_value(json!({"style_key": "ieee", "content": "Text"})).unwrap();

        assert_eq!(request.content_type, ContentType::Markdown);
        assert_eq!(request.template_type, "article");
        assert!(request.overrides.is_empty());
    }

    #[test]
    fn test_request_accepts_style_alias() {
        let request: TemplateRequest =
            serde_json::from_value(json!({"style": "apa", "content": "Text"})).unwrap();
        assert_eq!(request.style_key, "apa");
    }

    #[test]
    fn test_missing_content_deserializes_empty() {
        let request: TemplateRequest =
            serde_json::from_value(json!({"style_key": "apa"})).unwrap();
        assert!(request.content.is_empty());
    }

    #[test]
    fn test_content_type_lowercase() {
        let request: TemplateRequest = serde_json::from_value(
            json!({"style_key": "apa", "content": "{}", "content_type": "json"}),
        )
        .unwrap();
        assert_eq!(request.content_type, ContentType::Json);
        assert_eq!(request.content_type.to_string(), "json");
    }
}
