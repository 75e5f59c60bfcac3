//! Delivery of export payloads to targets.

use reqwest::Client;

use crate::error::DispatchError;
use crate::request::{ExportPayload, ResolvedTarget};

/// Maximum number of response body characters kept in an error.
const MAX_ERROR_BODY: usize = 200;

/// Sends an export payload to one target.
///
/// Implementations do not enforce deadlines; the coordinator bounds every
/// call with the target's timeout and drops the future when it expires.
pub trait TargetDispatcher: Send + Sync + 'static {
    fn dispatch(
        &self,
        target: &ResolvedTarget,
        payload: &ExportPayload,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;

    /// Request `url` and return the response status code.
    fn check_health(&self, url: &str) -> impl Future<Output = Result<u16, DispatchError>> + Send;
}

/// Posts payloads as JSON to `<base_url><export_path>`.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: Client,
    export_path: String,
}

impl HttpDispatcher {
    /// Create a dispatcher with a pooled HTTP client.
    pub fn new(export_path: impl Into<String>) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .build()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            export_path: export_path.into(),
        })
    }

    fn url(&self, target: &ResolvedTarget) -> String {
        format!(
            "{}{}",
            target.base_url.trim_end_matches('/'),
            self.export_path
        )
    }
}

impl TargetDispatcher for HttpDispatcher {
    async fn dispatch(
        &self,
        target: &ResolvedTarget,
        payload: &ExportPayload,
    ) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(self.url(target))
            .json(payload)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        Err(DispatchError::Http {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        })
    }

    async fn check_health(&self, url: &str) -> Result<u16, DispatchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use pubstyle_styles::StyleRegistry;
    use pubstyle_template::{TemplateProcessor, TemplateRequest};
    use uuid::Uuid;

    use super::*;
    use crate::format::ExportFormat;

    /// Serve a sibling stand-in on an ephemeral port and return its base URL.
    async fn spawn_sibling(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn payload() -> ExportPayload {
        let registry = Arc::new(StyleRegistry::builtin().unwrap());
        let style = (*registry.get("apa").unwrap()).clone();
        let document = TemplateProcessor::new(registry)
            .apply(&TemplateRequest::new("apa", "# Abstract\nText (Smith 2020)."))
            .unwrap();
        ExportPayload {
            export_id: Uuid::new_v4(),
            style_key: "apa".to_owned(),
            format: ExportFormat::Html,
            style,
            document,
            export_options: BTreeMap::from([("paper".to_owned(), serde_json::json!("letter"))]),
        }
    }

    fn target(base_url: String) -> ResolvedTarget {
        ResolvedTarget {
            name: "sibling".to_owned(),
            base_url,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_success_status_succeeds() {
        let router = Router::new().route(
            "/api/export",
            post(|axum::Json(body): axum::Json<serde_json::Value>| async move {
                if body["style_key"] == "apa"
                    && body["format"] == "html"
                    && body["export_options"]["paper"] == "letter"
                {
                    StatusCode::ACCEPTED
                } else {
                    StatusCode::BAD_REQUEST
                }
            }),
        );
        let base_url = spawn_sibling(router).await;
        let dispatcher = HttpDispatcher::new("/api/export").unwrap();

        let result = dispatcher.dispatch(&target(base_url), &payload()).await;

        assert!(result.is_ok(), "{result:?}");
    }

    #[tokio::test]
    async fn test_error_status_fails_with_body() {
        let router = Router::new().route(
            "/api/export",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        );
        let base_url = spawn_sibling(router).await;
        let dispatcher = HttpDispatcher::new("/api/export").unwrap();

        let err = dispatcher
            .dispatch(&target(base_url), &payload())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "HTTP 503: busy");
    }

    #[tokio::test]
    async fn test_unreachable_target_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let dispatcher = HttpDispatcher::new("/api/export").unwrap();

        let err = dispatcher
            .dispatch(&target(format!("http://{addr}")), &payload())
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_check_health_returns_status() {
        let router = Router::new()
            .route("/health", get(|| async { StatusCode::OK }))
            .route("/degraded", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let base_url = spawn_sibling(router).await;
        let dispatcher = HttpDispatcher::new("/api/export").unwrap();

        let ok = dispatcher.check_health(&format!("{base_url}/health")).await;
        let degraded = dispatcher.check_health(&format!("{base_url}/degraded")).await;

        assert_eq!(ok.unwrap(), 200);
        assert_eq!(degraded.unwrap(), 503);
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let dispatcher = HttpDispatcher::new("/api/export").unwrap();
        let target = ResolvedTarget {
            name: "style_assets".to_owned(),
            base_url: "http://localhost:5003/".to_owned(),
            timeout: Duration::from_secs(1),
        };

        assert_eq!(dispatcher.url(&target), "http://localhost:5003/api/export");
    }
}
