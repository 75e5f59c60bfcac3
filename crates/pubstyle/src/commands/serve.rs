//! `pubstyle serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use pubstyle_config::{CliSettings, Config};
use pubstyle_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover pubstyle.toml).
    #[arg(short, long, env = "PUBSTYLE_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory of custom style documents (overrides config).
    #[arg(short, long)]
    styles_dir: Option<PathBuf>,

    /// Enable verbose output (info-level logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            styles_dir: self.styles_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        match &config.styles_dir {
            Some(dir) => output.info(&format!("Custom styles: {}", dir.display())),
            None => output.info("Custom styles: none (built-in styles only)"),
        }
        for (name, service) in &config.services {
            output.info(&format!(
                "Export target {name}: {} ({} ms)",
                service.base_url,
                config.service_timeout_ms(service)
            ));
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
