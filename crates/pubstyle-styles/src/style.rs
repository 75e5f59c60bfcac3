//! Style definition data model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named publication style.
///
/// Immutable once registered; the registry hands out shared references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDefinition {
    /// Unique style key (e.g. `ieee`).
    ///
    /// Optional in custom style files, where the file stem is used instead.
    #[serde(default)]
    pub key: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Body text typography.
    pub typography: Typography,
    /// Page layout.
    pub layout: Layout,
    /// Citation and reference list formatting.
    pub citation: CitationStyle,
    /// Named text blocks (title, author, abstract, heading1, ...).
    #[serde(default)]
    pub headings: BTreeMap<String, TextBlockStyle>,
    /// Figure and table captions.
    #[serde(default)]
    pub captions: Captions,
}

/// Body text typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub font_family: String,
    /// Size with unit, e.g. `10pt`.
    pub font_size: String,
    pub line_spacing: f64,
}

/// Page layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub column_count: u32,
    /// Paper size identifier, e.g. `letter` or `a4`.
    pub page_size: String,
    #[serde(default)]
    pub margins: Margins,
}

/// Page margins with units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: "1in".to_owned(),
            bottom: "1in".to_owned(),
            left: "1in".to_owned(),
            right: "1in".to_owned(),
        }
    }
}

/// Citation formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationStyle {
    /// Citation format identifier, e.g. `ieee_numeric` or `apa`.
    pub format: String,
    #[serde(default = "default_citation_font_size")]
    pub font_size: String,
    #[serde(default = "default_hanging_indent")]
    pub hanging_indent: String,
}

fn default_citation_font_size() -> String {
    "10pt".to_owned()
}

fn default_hanging_indent() -> String {
    "0.5in".to_owned()
}

/// Formatting of a titled block such as a heading or the abstract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlockStyle {
    pub font_size: String,
    pub font_weight: String,
    pub alignment: String,
    /// Heading numbering scheme (`roman_upper`, `alpha_upper`, `none`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbering: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<String>,
}

/// Caption formatting for figures and tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Captions {
    pub figure: CaptionStyle,
    pub table: CaptionStyle,
}

impl Default for Captions {
    fn default() -> Self {
        Self {
            figure: CaptionStyle::new("Figure"),
            table: CaptionStyle::new("Table"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionStyle {
    /// Label prefix, e.g. `Fig.`.
    pub prefix: String,
    pub font_size: String,
    pub alignment: String,
}

impl CaptionStyle {
    fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            font_size: "10pt".to_owned(),
            alignment: "left".to_owned(),
        }
    }
}

/// Where a registered style came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleSource {
    /// Shipped with the service.
    Builtin,
    /// Loaded from the custom styles directory.
    Custom,
}

/// Listing entry for a registered style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleSummary {
    pub key: String,
    pub name: String,
    pub description: String,
    pub source: StyleSource,
}
