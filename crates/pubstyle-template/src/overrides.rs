//! Resolution of style attributes from defaults and request overrides.

use std::collections::BTreeMap;

use pubstyle_styles::StyleDefinition;
use serde_json::Value;

use crate::error::TemplateError;
use crate::request::StyleAttributes;

/// Override options the processor understands.
pub const SUPPORTED_OVERRIDES: [&str; 6] = [
    "font_family",
    "font_size",
    "line_spacing",
    "column_count",
    "page_size",
    "citation_style",
];

/// Resolve attributes: an explicit override wins over the style default.
///
/// Unknown options are returned as warnings. Any malformed recognized option
/// fails the whole resolution.
pub(crate) fn resolve(
    style: &StyleDefinition,
    overrides: &BTreeMap<String, Value>,
) -> Result<(StyleAttributes, Vec<String>), TemplateError> {
    let mut attributes = StyleAttributes {
        font_family: style.typography.font_family.clone(),
        font_size: style.typography.font_size.clone(),
        line_spacing: style.typography.line_spacing,
        column_count: style.layout.column_count,
        page_size: style.layout.page_size.clone(),
        citation_style: style.citation.format.clone(),
    };
    let mut warnings = Vec::new();

    for (option, value) in overrides {
        match option.as_str() {
            "font_family" => attributes.font_family = text(option, value)?,
            "font_size" => attributes.font_size = font_size(option, value)?,
            "line_spacing" => attributes.line_spacing = line_spacing(option, value)?,
            "column_count" => attributes.column_count = column_count(option, value)?,
            "page_size" => attributes.page_size = text(option, value)?,
            "citation_style" => attributes.citation_style = text(option, value)?,
            _ => warnings.push(format!("Unsupported override option: {option}")),
        }
    }

    Ok((attributes, warnings))
}

fn invalid(option: &str, reason: &str) -> TemplateError {
    TemplateError::InvalidOverride {
        option: option.to_owned(),
        reason: reason.to_owned(),
    }
}

fn text(option: &str, value: &Value) -> Result<String, TemplateError> {
    match value.as_str().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_owned()),
        _ => Err(invalid(option, "expected a non-empty string")),
    }
}

/// Accepts `"11pt"` or a bare number of points.
fn font_size(option: &str, value: &Value) -> Result<String, TemplateError> {
    match value {
        // f64 display drops a zero fraction: 10.0 -> "10pt", 10.5 -> "10.5pt".
        Value::Number(n) => match n.as_f64() {
            Some(points) if points.is_finite() && points > 0.0 => Ok(format!("{points}pt")),
            _ => Err(invalid(option, "expected a positive size")),
        },
        Value::String(_) => text(option, value),
        _ => Err(invalid(option, "expected a size such as \"11pt\"")),
    }
}

/// Accepts a positive number or a numeric string.
fn line_spacing(option: &str, value: &Value) -> Result<f64, TemplateError> {
    let spacing = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    spacing
        .filter(|s| s.is_finite() && *s > 0.0)
        .ok_or_else(|| invalid(option, "expected a positive number"))
}

fn column_count(option: &str, value: &Value) -> Result<u32, TemplateError> {
    value
        .as_u64()
        .filter(|&n| n >= 1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| invalid(option, "expected a positive integer"))
}
