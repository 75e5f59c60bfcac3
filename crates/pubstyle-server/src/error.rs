//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pubstyle_export::ExportError;
use pubstyle_template::TemplateError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No style with the given key.
    #[error("Style not found: {0}")]
    StyleNotFound(String),

    /// No template type with the given name.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Request body is not valid JSON for the endpoint.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Template processing rejected the request.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Export coordination rejected the request.
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::StyleNotFound(_)
            | Self::TemplateNotFound(_)
            | Self::Export(ExportError::UnknownStyle(_)) => StatusCode::NOT_FOUND,
            Self::InvalidBody(_)
            | Self::Template(_)
            | Self::Export(ExportError::Validation(_) | ExportError::Template(_)) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(error = %self, %status, "Request rejected");

        (status, axum::Json(json!({"error": self.to_string()}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServerError::StyleNotFound("x".to_owned()), StatusCode::NOT_FOUND),
            (
                ServerError::Export(ExportError::UnknownStyle("x".to_owned())),
                StatusCode::NOT_FOUND,
            ),
            (
                ServerError::Template(TemplateError::UnknownStyle("x".to_owned())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServerError::Export(ExportError::Validation("no targets".to_owned())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServerError::Export(ExportError::Template(TemplateError::EmptyContent)),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status(), expected, "{error}");
        }
    }

    #[test]
    fn test_error_message() {
        let error = ServerError::Export(ExportError::Template(TemplateError::EmptyContent));
        assert_eq!(error.to_string(), "Content is required");
    }
}
