//! Configuration management for Pubstyle.
//!
//! Parses `pubstyle.toml` with serde and discovers the file in the current
//! directory or any parent. CLI flags are applied on top via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! These string values support `${VAR}` and `${VAR:-default}`:
//!
//! - `server.host`
//! - `services.<name>.base_url`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the custom styles directory.
    pub styles_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "pubstyle.toml";

/// Default per-target export deadline.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Styles configuration (directory as written in TOML).
    styles: StylesConfigRaw,
    /// Export coordination defaults.
    pub export: ExportConfig,
    /// Sibling services reachable as export targets, keyed by name.
    #[serde(default = "default_services")]
    pub services: BTreeMap<String, ServiceConfig>,

    /// Resolved custom styles directory (set after loading).
    #[serde(skip)]
    pub styles_dir: Option<PathBuf>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            styles: StylesConfigRaw::default(),
            export: ExportConfig::default(),
            services: default_services(),
            styles_dir: None,
            config_path: None,
        }
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5002,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StylesConfigRaw {
    dir: Option<String>,
}

/// Export coordination defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Deadline for a single target call, in milliseconds.
    pub timeout_ms: u64,
    /// Path appended to a target's base URL when dispatching.
    pub export_path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            export_path: "/api/export".to_owned(),
        }
    }
}

/// A sibling service that can take part in an export.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL, e.g. `http://localhost:5003`.
    pub base_url: String,
    /// Deadline override for this service, in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Path probed by the service status check.
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

fn default_health_path() -> String {
    "/health".to_owned()
}

impl ServiceConfig {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            timeout_ms: None,
            health_path: default_health_path(),
        }
    }
}

fn default_services() -> BTreeMap<String, ServiceConfig> {
    BTreeMap::from([
        (
            "distance_server".to_owned(),
            ServiceConfig::new("http://localhost:5001"),
        ),
        (
            "style_assets".to_owned(),
            ServiceConfig::new("http://localhost:5003"),
        ),
        (
            "styles_gallery".to_owned(),
            ServiceConfig::new("http://localhost:4090"),
        ),
    ])
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. "`server.host`").
        field: String,
        /// Error message (e.g. "${`HOST`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `pubstyle.toml` in the current directory and its parents, falling
    /// back to defaults when none exists.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(styles_dir) = &settings.styles_dir {
            self.styles_dir = Some(styles_dir.clone());
        }
    }

    /// Effective deadline for `service`, falling back to `export.timeout_ms`.
    #[must_use]
    pub fn service_timeout_ms(&self, service: &ServiceConfig) -> u64 {
        service.timeout_ms.unwrap_or(self.export.timeout_ms)
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        if self.export.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "export.timeout_ms must be greater than 0".to_owned(),
            ));
        }
        if !self.export.export_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "export.export_path must start with /".to_owned(),
            ));
        }

        for (name, service) in &self.services {
            let field = format!("services.{name}.base_url");
            require_non_empty(&service.base_url, &field)?;
            require_http_url(&service.base_url, &field)?;
            if service.timeout_ms == Some(0) {
                return Err(ConfigError::Validation(format!(
                    "services.{name}.timeout_ms must be greater than 0"
                )));
            }
            if !service.health_path.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "services.{name}.health_path must start with /"
                )));
            }
        }

        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        for (name, service) in &mut self.services {
            let field = format!("services.{name}.base_url");
            service.base_url = expand::expand_env(&service.base_url, &field)?;
        }

        Ok(())
    }

    /// Resolve the styles directory relative to the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.styles_dir = self.styles.dir.as_deref().map(|dir| config_dir.join(dir));
    }
}
