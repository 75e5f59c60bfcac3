//! Error types for template processing.

use crate::request::ContentType;

/// Template processing error.
///
/// Every variant is a validation failure of the request; processing has no
/// other way to fail.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The request named no style.
    #[error("Style key is required")]
    MissingStyle,

    /// The style key is not registered.
    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    /// The template type is not one of the known templates.
    #[error("Unsupported template type: {0}")]
    UnknownTemplate(String),

    /// Content is empty or whitespace only.
    #[error("Content is required")]
    EmptyContent,

    /// Content does not parse as its declared type.
    #[error("Content is not valid {content_type}: {reason}")]
    MalformedContent {
        content_type: ContentType,
        reason: String,
    },

    /// A recognized override option carries an unusable value.
    #[error("Invalid value for override {option}: {reason}")]
    InvalidOverride { option: String, reason: String },
}
