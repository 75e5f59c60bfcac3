//! Error types for export coordination.

use pubstyle_template::TemplateError;

/// Export request error.
///
/// Raised before any target is contacted. Target failures never surface
/// here; they are recorded in the outcome.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The style key is not registered.
    #[error("Style not found: {0}")]
    UnknownStyle(String),

    /// The request is incomplete or names an unsupported format.
    #[error("{0}")]
    Validation(String),

    /// The content could not be processed with the style.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Failure of a single target dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The target answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The target could not be reached.
    #[error("{0}")]
    Transport(String),

    /// The target names no configured service.
    #[error("service not configured")]
    NotConfigured,
}
