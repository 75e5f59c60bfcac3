//! Application state.
//!
//! Shared state for all request handlers. Everything here is read-only after
//! startup; per-request data lives in the handlers.

use std::sync::Arc;

use pubstyle_export::{ExportCoordinator, HttpDispatcher};
use pubstyle_styles::StyleRegistry;
use pubstyle_template::TemplateProcessor;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Registered styles.
    pub(crate) registry: Arc<StyleRegistry>,
    /// Applies styles to submitted content.
    pub(crate) processor: TemplateProcessor,
    /// Fans exports out to sibling services.
    pub(crate) coordinator: ExportCoordinator<HttpDispatcher>,
    /// Application version reported by the health check.
    pub(crate) version: String,
}
