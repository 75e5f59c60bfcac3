//! Styles API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use pubstyle_styles::{StyleDefinition, StyleSummary, StyleValidation, validate_document};
use serde_json::Value;

use crate::error::ServerError;
use crate::handlers::json_body;
use crate::state::AppState;

/// Handle GET /api/styles.
pub(crate) async fn list_styles(State(state): State<Arc<AppState>>) -> Json<Vec<StyleSummary>> {
    Json(state.registry.list())
}

/// Handle GET /api/styles/{style_key}.
pub(crate) async fn get_style(
    Path(style_key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StyleDefinition>, ServerError> {
    let style = state
        .registry
        .get(&style_key)
        .map_err(|_| ServerError::StyleNotFound(style_key))?;
    Ok(Json(style.as_ref().clone()))
}

/// Handle POST /api/styles/validate.
///
/// Structural problems are reported in the body, not as an error status.
pub(crate) async fn validate_style(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<StyleValidation>, ServerError> {
    let document = json_body(body)?;
    Ok(Json(validate_document(&document)))
}
