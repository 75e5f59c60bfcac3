//! HTTP server for the Pubstyle publication style service.
//!
//! This crate provides an axum server exposing:
//! - Style lookup and style document validation
//! - Template types and template processing
//! - Export coordination across sibling services
//! - A health check
//!
//! # Quick Start
//!
//! ```ignore
//! use pubstyle_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 5002,
//!         version: "1.0.0".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Client ──HTTP──► axum router (pubstyle-server)
//!                       │
//!                       ├─► /api/styles/*      ──► StyleRegistry
//!                       ├─► /api/template/*    ──► TemplateProcessor
//!                       └─► /api/export/*      ──► ExportCoordinator
//!                                                       │
//!                                                       └─► sibling services (HTTP)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use pubstyle_export::{CoordinatorSettings, ExportCoordinator, HttpDispatcher, Service};
use pubstyle_styles::StyleRegistry;
use pubstyle_template::TemplateProcessor;
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory of custom style documents (`None` serves built-ins only).
    pub styles_dir: Option<PathBuf>,
    /// Path appended to a target's base URL when dispatching an export.
    pub export_path: String,
    /// Default per-target export deadline.
    pub export_timeout: Duration,
    /// Sibling services available as export targets.
    pub services: BTreeMap<String, Service>,
    /// Application version (reported by the health check).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5002,
            styles_dir: None,
            export_path: "/api/export".to_owned(),
            export_timeout: Duration::from_secs(10),
            services: BTreeMap::new(),
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the styles cannot be loaded or the server fails to
/// start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(create_state(&config)?);
    tracing::info!(
        styles = state.registry.len(),
        services = state.coordinator.services().len(),
        "Loaded state"
    );

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the shared state: built-in styles, then custom styles, then the
/// processor and coordinator over the finished registry.
pub(crate) fn create_state(config: &ServerConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let mut registry = StyleRegistry::builtin()?;
    if let Some(dir) = &config.styles_dir {
        registry.load_dir(dir)?;
    }
    let registry = Arc::new(registry);

    let settings = CoordinatorSettings {
        default_timeout: config.export_timeout,
        services: config.services.clone(),
    };
    let dispatcher = HttpDispatcher::new(config.export_path.clone())?;

    Ok(AppState {
        processor: TemplateProcessor::new(Arc::clone(&registry)),
        coordinator: ExportCoordinator::new(Arc::clone(&registry), dispatcher, settings),
        registry,
        version: config.version.clone(),
    })
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Pubstyle config.
#[must_use]
pub fn server_config_from_config(config: &pubstyle_config::Config, version: String) -> ServerConfig {
    let services = config
        .services
        .iter()
        .map(|(name, service)| {
            (
                name.clone(),
                Service {
                    base_url: service.base_url.clone(),
                    timeout: service.timeout_ms.map(Duration::from_millis),
                    health_path: service.health_path.clone(),
                },
            )
        })
        .collect();

    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        styles_dir: config.styles_dir.clone(),
        export_path: config.export.export_path.clone(),
        export_timeout: Duration::from_millis(config.export.timeout_ms),
        services,
        version,
    }
}
