//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use arrivalseq::config::{AirportConfigError, ConfigFileError};
use arrivalseq::error::SequenceError;
use arrivalseq::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Settings file could not be read or written
    Settings(ConfigFileError),
    /// Airport configuration could not be loaded
    Airport(AirportConfigError),
    /// Sequencer could not be created
    Service(ServiceError),
    /// Scenario file could not be read or parsed
    Scenario { path: PathBuf, reason: String },
    /// A scenario step was rejected by the sequence
    Step { step: usize, error: SequenceError },
    /// Failed to write output
    Output(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Airport(AirportConfigError::Invalid { .. }) => {
                eprintln!();
                eprintln!("Check that:");
                eprintln!("  1. Every runway mode only uses runways listed under \"runways\"");
                eprintln!("  2. Landing rates are greater than zero");
                eprintln!("  3. Arrival patterns are valid regular expressions");
            }
            CliError::Settings(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Run 'arrivalseq settings show' to see the current values.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Settings(e) => write!(f, "Settings error: {}", e),
            CliError::Airport(e) => write!(f, "Airport configuration error: {}", e),
            CliError::Service(e) => write!(f, "Failed to create sequencer: {}", e),
            CliError::Scenario { path, reason } => {
                write!(f, "Invalid scenario '{}': {}", path.display(), reason)
            }
            CliError::Step { step, error } => write!(f, "Scenario step {} failed: {}", step, error),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Settings(e) => Some(e),
            CliError::Airport(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::Step { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Settings(e)
    }
}

impl From<AirportConfigError> for CliError {
    fn from(e: AirportConfigError) -> Self {
        CliError::Airport(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}
