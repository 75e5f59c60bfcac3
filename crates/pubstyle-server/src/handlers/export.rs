//! Export API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use pubstyle_export::{ExportOutcome, ExportRequest, Service, ServiceStatusReport};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::json_body;
use crate::state::AppState;

/// Handle POST /api/export/coordinate.
///
/// Responds 200 whenever the export was dispatched, including when every
/// target failed; the outcome carries the per-target results.
pub(crate) async fn coordinate_export(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Json<ExportOutcome>, ServerError> {
    let request = json_body(body)?;
    let outcome = state.coordinator.coordinate(request).await?;
    Ok(Json(outcome))
}

/// A configured sibling service.
#[derive(Serialize)]
pub(crate) struct ServiceEntry {
    name: String,
    #[serde(flatten)]
    service: Service,
}

/// Response for GET /api/export/services.
#[derive(Serialize)]
pub(crate) struct ServicesResponse {
    services: Vec<ServiceEntry>,
}

/// Handle GET /api/export/services.
///
/// Lists configuration only; services are not contacted.
pub(crate) async fn list_services(State(state): State<Arc<AppState>>) -> Json<ServicesResponse> {
    let services = state
        .coordinator
        .services()
        .iter()
        .map(|(name, service)| ServiceEntry {
            name: name.clone(),
            service: service.clone(),
        })
        .collect();
    Json(ServicesResponse { services })
}

/// Handle GET /api/export/services/status.
///
/// Probes every configured service's health endpoint.
pub(crate) async fn service_status(
    State(state): State<Arc<AppState>>,
) -> Json<ServiceStatusReport> {
    Json(state.coordinator.service_status().await)
}
