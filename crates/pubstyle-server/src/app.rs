//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/styles", get(handlers::styles::list_styles))
        .route("/api/styles/validate", post(handlers::styles::validate_style))
        .route("/api/styles/{style_key}", get(handlers::styles::get_style))
        .route("/api/templates", get(handlers::templates::list_templates))
        .route(
            "/api/templates/{template_name}",
            get(handlers::templates::get_template),
        )
        .route(
            "/api/template/process",
            post(handlers::templates::process_template),
        )
        .route(
            "/api/export/coordinate",
            post(handlers::export::coordinate_export),
        )
        .route(
            "/api/export/services",
            get(handlers::export::list_services),
        )
        .route(
            "/api/export/services/status",
            get(handlers::export::service_status),
        );

    Router::new()
        .merge(api_routes)
        .route("/health", get(handlers::health::get_health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::no_sniff_layer())
                .layer(security::deny_framing_layer())
                .layer(security::referrer_policy_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use pubstyle_export::Service;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{ServerConfig, create_state};

    fn router_with(config: &ServerConfig) -> Router {
        create_router(Arc::new(create_state(config).unwrap()))
    }

    fn router() -> Router {
        router_with(&ServerConfig {
            version: "1.2.3".to_owned(),
            ..ServerConfig::default()
        })
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        send(router, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(router: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(router, request).await
    }

    /// Serve a sibling stand-in on an ephemeral port and return its base URL.
    async fn spawn_sibling(delay: Duration) -> String {
        let sibling = Router::new()
            .route(
                "/api/export",
                post(move || async move {
                    tokio::time::sleep(delay).await;
                    StatusCode::OK
                }),
            )
            .route("/health", get(|| async { StatusCode::OK }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, sibling).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_list_styles_in_registration_order() {
        let (status, body) = get_json(router(), "/api/styles").await;

        assert_eq!(status, StatusCode::OK);
        let keys: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["ieee", "nature", "apa"]);
        assert_eq!(body[0]["source"], "builtin");
    }

    #[tokio::test]
    async fn test_get_style() {
        let (status, body) = get_json(router(), "/api/styles/nature").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], "nature");
        assert_eq!(body["layout"]["page_size"], "a4");
    }

    #[tokio::test]
    async fn test_unknown_style_is_not_found() {
        let (status, body) = get_json(router(), "/api/styles/chicago").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Style not found: chicago"}));
    }

    #[tokio::test]
    async fn test_custom_styles_dir_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let style = json!({
            "name": "House",
            "description": "In-house reports",
            "typography": {"font_family": "Inter", "font_size": "11pt", "line_spacing": 1.2},
            "layout": {"column_count": 1, "page_size": "a4"},
            "citation": {"format": "apa"}
        });
        std::fs::write(dir.path().join("house.json"), style.to_string()).unwrap();
        let router = router_with(&ServerConfig {
            styles_dir: Some(dir.path().to_path_buf()),
            ..ServerConfig::default()
        });

        let (status, body) = get_json(router, "/api/styles").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[3]["key"], "house");
        assert_eq!(body[3]["source"], "custom");
    }

    #[tokio::test]
    async fn test_validate_style_document() {
        let (status, body) = post_json(
            router(),
            "/api/styles/validate",
            &json!({"name": "Draft", "typography": {"font_family": "Inter"}}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert!(!body["errors"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_template() {
        let (status, body) = get_json(router(), "/api/templates/thesis").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["max_abstract_words"], 350);

        let (status, _) = get_json(router(), "/api/templates/memo").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get_json(router(), "/api/templates").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_process_template_with_override() {
        let (status, body) = post_json(
            router(),
            "/api/template/process",
            &json!({"style_key": "ieee", "content": "...", "overrides": {"column_count": 1}}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attributes"]["column_count"], 1);
        assert_eq!(body["warnings"], json!([]));
    }

    #[tokio::test]
    async fn test_process_template_unknown_override_warns() {
        let (status, body) = post_json(
            router(),
            "/api/template/process",
            &json!({"style": "apa", "content": "Body.", "overrides": {"watermark": "DRAFT"}}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["warnings"],
            json!(["Unsupported override option: watermark"])
        );
    }

    #[tokio::test]
    async fn test_process_template_rejections() {
        let cases = [
            json!({"style_key": "chicago", "content": "Body."}),
            json!({"style_key": "ieee", "content": "   "}),
            json!({"style_key": "ieee"}),
            json!({"style_key": "ieee", "content": "Body.", "overrides": {"column_count": 0}}),
        ];
        for case in cases {
            let (status, body) = post_json(router(), "/api/template/process", &case).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
            assert!(body["error"].is_string(), "{case}");
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let request = Request::post("/api/template/process")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(router(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body")
        );
    }

    #[tokio::test]
    async fn test_export_partial_success_with_timed_out_target() {
        let fast = spawn_sibling(Duration::ZERO).await;
        let slow = spawn_sibling(Duration::from_secs(5)).await;

        let (status, body) = post_json(
            router(),
            "/api/export/coordinate",
            &json!({
                "style_key": "nature",
                "content": "# Title\nStyles\n# Abstract\nText.",
                "targets": [
                    {"name": "assets", "base_url": fast},
                    {"name": "gallery", "base_url": slow, "timeout_ms": 200}
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "partial-success");
        assert_eq!(body["targets"][0]["status"], "succeeded");
        assert_eq!(body["targets"][1]["name"], "gallery");
        assert_eq!(body["targets"][1]["status"], "timed_out");
    }

    #[tokio::test]
    async fn test_export_rejections() {
        let (status, _) = post_json(
            router(),
            "/api/export/coordinate",
            &json!({"style_key": "chicago", "content": "Body.", "targets": ["style_assets"]}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = post_json(
            router(),
            "/api/export/coordinate",
            &json!({"style_key": "ieee", "content": "Body.", "targets": []}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "At least one target is required");
    }

    #[tokio::test]
    async fn test_list_services() {
        let router = router_with(&ServerConfig {
            services: BTreeMap::from([(
                "style_assets".to_owned(),
                Service {
                    base_url: "http://localhost:5003".to_owned(),
                    timeout: Some(Duration::from_millis(1500)),
                    health_path: "/health".to_owned(),
                },
            )]),
            ..ServerConfig::default()
        });

        let (status, body) = get_json(router, "/api/export/services").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"services": [{
                "name": "style_assets",
                "base_url": "http://localhost:5003",
                "timeout_ms": 1500,
                "health_path": "/health"
            }]})
        );
    }

    #[tokio::test]
    async fn test_service_status_reports_each_service() {
        let up = spawn_sibling(Duration::ZERO).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let down = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let service = |base_url: String| Service {
            base_url,
            timeout: Some(Duration::from_secs(2)),
            health_path: "/health".to_owned(),
        };
        let router = router_with(&ServerConfig {
            services: BTreeMap::from([
                ("style_assets".to_owned(), service(up)),
                ("styles_gallery".to_owned(), service(down)),
            ]),
            ..ServerConfig::default()
        });

        let (status, body) = get_json(router, "/api/export/services/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_services"], 2);
        assert_eq!(body["healthy_services"], 1);
        assert_eq!(body["services"][0]["name"], "style_assets");
        assert_eq!(body["services"][0]["healthy"], true);
        assert_eq!(body["services"][0]["status_code"], 200);
        assert_eq!(body["services"][1]["healthy"], false);
        assert!(body["services"][1]["error"].is_string());
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(router(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "status": "healthy",
                "service": "publication-style-config-server",
                "version": "1.2.3"
            })
        );
    }

    #[tokio::test]
    async fn test_security_headers() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["referrer-policy"], "no-referrer");
        assert!(
            headers["content-security-policy"]
                .to_str()
                .unwrap()
                .contains("default-src 'none'")
        );
    }
}
