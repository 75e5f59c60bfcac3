//! `pubstyle validate` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use pubstyle_styles::{StyleValidation, validate_document};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the validate command.
#[derive(Args)]
pub(crate) struct ValidateArgs {
    /// Style documents (JSON) to check.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

impl ValidateArgs {
    /// Validate every file and report the results.
    ///
    /// # Errors
    ///
    /// Returns an error if any file is unreadable or invalid. Warnings alone
    /// do not fail the command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let mut invalid = 0;

        for path in &self.files {
            output.heading(&path.display().to_string());
            let validation = validate_file(path)?;

            for error in &validation.errors {
                output.error(&format!("  error: {error}"));
            }
            for warning in &validation.warnings {
                output.warning(&format!("  warning: {warning}"));
            }
            if validation.valid {
                output.success("  valid");
            } else {
                invalid += 1;
            }
        }

        if invalid > 0 {
            return Err(CliError::Validation(format!(
                "{invalid} of {} style documents are invalid",
                self.files.len()
            )));
        }
        Ok(())
    }
}

/// Read and validate one style document.
///
/// A file that is not JSON is reported as an invalid document.
fn validate_file(path: &Path) -> Result<StyleValidation, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(match serde_json::from_str(&text) {
        Ok(document) => validate_document(&document),
        Err(e) => StyleValidation {
            valid: false,
            errors: vec![format!("Invalid JSON: {e}")],
            warnings: Vec::new(),
        },
    })
}
