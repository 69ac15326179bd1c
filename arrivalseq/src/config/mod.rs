//! Configuration for the sequencing engine.
//!
//! Two layers of configuration exist:
//!
//! - **Airport configuration** (JSON, one file per airport): runways, runway
//!   modes, feeder fixes, arrival procedures and runway assignment rules.
//! - **Engine settings** (INI, `~/.arrivalseq/settings.ini`): stability
//!   thresholds, estimation, cleanup, tick interval and logging.
//!
//! # Example
//!
//! ```
//! use arrivalseq::config::SettingsFile;
//!
//! let settings = SettingsFile::default();
//! let thresholds = settings.stability.thresholds();
//! assert_eq!(thresholds.frozen_threshold.num_minutes(), 15);
//! ```

mod airport;
mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use airport::{
    AirportConfigError, AirportConfiguration, ArrivalConfiguration, FeederFixConfiguration,
    RunwayAssignmentRule, RunwayConfiguration, RunwayModeConfiguration, RunwayPreferences,
    RunwayRateConfiguration, RunwayRequirements,
};
pub(crate) use airport::contains_ignore_case;
#[cfg(test)]
pub(crate) use airport::fixtures;
pub use file::{config_directory, settings_file_path, ConfigFileError};
pub use defaults::{
    default_log_directory, DEFAULT_CREATION_THRESHOLD_SECS, DEFAULT_FROZEN_THRESHOLD_SECS,
    DEFAULT_LANDED_TIMEOUT_SECS, DEFAULT_LOG_FILE, DEFAULT_LOST_TIMEOUT_SECS,
    DEFAULT_MAX_LANDED_FLIGHTS, DEFAULT_MINIMUM_UNSTABLE_SECS, DEFAULT_STABLE_THRESHOLD_SECS,
    DEFAULT_TICK_INTERVAL_SECS, DEFAULT_TRAJECTORY_RANGE_NM,
};
pub use settings::{
    CleanupSettings, EstimationSettings, LoggingSettings, SchedulerSettings, SettingsFile,
    StabilitySettings,
};
