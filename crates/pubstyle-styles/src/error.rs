//! Error types for the style registry.

use std::path::PathBuf;

/// Style registry error.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// No style is registered under the key.
    #[error("Style not found: {0}")]
    NotFound(String),

    /// A style document could not be deserialized.
    #[error("Invalid style document {origin}: {source}")]
    Parse {
        /// Built-in key or file path of the document.
        origin: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A style directory could not be read.
    #[error("Failed to read style directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
