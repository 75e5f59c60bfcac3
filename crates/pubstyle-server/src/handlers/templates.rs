//! Template API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use pubstyle_template::{TemplateRequest, TemplateResult, TemplateType, template, templates};

use crate::error::ServerError;
use crate::handlers::json_body;
use crate::state::AppState;

/// Handle GET /api/templates.
pub(crate) async fn list_templates() -> Json<&'static [TemplateType]> {
    Json(templates())
}

/// Handle GET /api/templates/{template_name}.
pub(crate) async fn get_template(
    Path(name): Path<String>,
) -> Result<Json<&'static TemplateType>, ServerError> {
    template(&name)
        .map(Json)
        .ok_or(ServerError::TemplateNotFound(name))
}

/// Handle POST /api/template/process.
pub(crate) async fn process_template(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TemplateRequest>, JsonRejection>,
) -> Result<Json<TemplateResult>, ServerError> {
    let request = json_body(body)?;
    let result = state.processor.apply(&request)?;
    Ok(Json(result))
}
