//! HTTP request handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::error::ServerError;

pub(crate) mod export;
pub(crate) mod health;
pub(crate) mod styles;
pub(crate) mod templates;

/// Unwrap a JSON body, turning extractor rejections into JSON errors.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ServerError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ServerError::InvalidBody(rejection.body_text()))
}
