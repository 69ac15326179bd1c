//! CLI runner for common setup.
//!
//! Encapsulates settings loading and logging initialization so command
//! handlers start from the same state.

use std::path::Path;

use arrivalseq::config::SettingsFile;
use arrivalseq::logging::{init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded settings
    settings: SettingsFile,
}

impl CliRunner {
    /// Load settings and initialize logging.
    ///
    /// Logs always go to the configured file. With `debug_mode` they are also
    /// echoed to stdout at debug level.
    ///
    /// # Arguments
    ///
    /// * `settings_path` - Settings file to use instead of ~/.arrivalseq/settings.ini
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn new(settings_path: Option<&Path>, debug_mode: bool) -> Result<Self, CliError> {
        let settings = match settings_path {
            Some(path) => SettingsFile::load_from(path)?,
            None => SettingsFile::load()?,
        };

        let logging_guard = init_logging(
            &settings.logging.directory,
            &settings.logging.file,
            debug_mode,
            debug_mode,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            settings,
        })
    }

    /// Get the loaded settings.
    pub fn settings(&self) -> &SettingsFile {
        &self.settings
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("arrivalseq v{}", arrivalseq::VERSION);
        info!(
            log = %self.settings.logging.directory.join(&self.settings.logging.file).display(),
            "arrivalseq CLI: {} command",
            command
        );
    }
}
