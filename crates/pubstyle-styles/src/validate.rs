//! Structural checks for style documents.
//!
//! Works on raw JSON so that a document with several problems reports all
//! of them, instead of stopping at the first deserialization error.

use serde::Serialize;
use serde_json::Value;

/// Recommended line spacing range.
const LINE_SPACING_RANGE: std::ops::RangeInclusive<f64> = 0.5..=3.0;

const MARGIN_SIDES: [&str; 4] = ["top", "bottom", "left", "right"];

/// Outcome of validating a style document.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct StyleValidation {
    /// `false` when any error was found.
    pub valid: bool,
    /// Problems that prevent the document from being registered.
    pub errors: Vec<String>,
    /// Problems worth fixing that do not block registration.
    pub warnings: Vec<String>,
}

impl StyleValidation {
    fn error(&mut self, message: String) {
        self.valid = false;
        self.errors.push(message);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Validate a style document in the registry's JSON shape.
pub fn validate_document(document: &Value) -> StyleValidation {
    let mut report = StyleValidation {
        valid: true,
        ..StyleValidation::default()
    };

    if !document.is_object() {
        report.error("Style document must be a JSON object".to_owned());
        return report;
    }

    for field in [
        "name",
        "typography.font_family",
        "typography.font_size",
        "typography.line_spacing",
        "layout.column_count",
        "layout.page_size",
        "citation.format",
    ] {
        if lookup(document, field).is_none() {
            report.error(format!("Missing required field: {field}"));
        }
    }

    if let Some(font_size) = lookup(document, "typography.font_size").and_then(Value::as_str)
        && !font_size.ends_with("pt")
    {
        report.warn("Font size should include unit (e.g., \"12pt\")".to_owned());
    }

    if let Some(spacing) = lookup(document, "typography.line_spacing") {
        match spacing.as_f64() {
            Some(value) if !LINE_SPACING_RANGE.contains(&value) => report.warn(format!(
                "Line spacing outside recommended range ({}-{})",
                LINE_SPACING_RANGE.start(),
                LINE_SPACING_RANGE.end()
            )),
            Some(_) => {}
            None => report.error("Line spacing must be a number".to_owned()),
        }
    }

    if let Some(columns) = lookup(document, "layout.column_count")
        && !columns.as_u64().is_some_and(|n| n >= 1 && u32::try_from(n).is_ok())
    {
        report.error("Column count must be a positive integer".to_owned());
    }

    if let Some(margins) = lookup(document, "layout.margins") {
        for side in MARGIN_SIDES {
            if margins.get(side).is_none() {
                report.warn(format!("Missing margin: {side}"));
            }
        }
    }

    report
}

/// Resolve a dotted path such as `typography.font_size`.
fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |value, segment| value.get(segment))
        .filter(|value| !value.is_null())
}
