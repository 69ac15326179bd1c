//! Default values and constants for all settings.
//!
//! Contains all `DEFAULT_*` constants and the `SettingsFile::default()`
//! implementation.

use std::path::PathBuf;

use super::settings::*;

// =============================================================================
// Stability
// =============================================================================

/// Default minimum Unstable duration after activation (3 minutes).
pub const DEFAULT_MINIMUM_UNSTABLE_SECS: u64 = 180;

/// Default time-to-feeder-fix Stable threshold (25 minutes).
pub const DEFAULT_STABLE_THRESHOLD_SECS: u64 = 1500;

/// Default time-to-landing Frozen threshold (15 minutes).
pub const DEFAULT_FROZEN_THRESHOLD_SECS: u64 = 900;

// =============================================================================
// Estimation
// =============================================================================

/// Default trajectory range around the feeder fix (50 nm).
pub const DEFAULT_TRAJECTORY_RANGE_NM: f64 = 50.0;

/// Default flight creation threshold (2 hours before the feeder fix).
pub const DEFAULT_CREATION_THRESHOLD_SECS: u64 = 7200;

// =============================================================================
// Cleanup
// =============================================================================

/// Default number of Landed flights kept.
pub const DEFAULT_MAX_LANDED_FLIGHTS: usize = 5;

/// Default Landed timeout (10 minutes).
pub const DEFAULT_LANDED_TIMEOUT_SECS: u64 = 600;

/// Default lost-flight timeout (5 minutes).
pub const DEFAULT_LOST_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// Scheduler and logging
// =============================================================================

/// Default scheduling tick interval (5 seconds).
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 5;

/// Minimum accepted tick interval.
pub const MIN_TICK_INTERVAL_SECS: u64 = 1;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "arrivalseq.log";

/// Clamps the tick interval to at least one second and logs a warning if clamped.
pub(super) fn clamp_tick_interval(value: u64) -> u64 {
    if value < MIN_TICK_INTERVAL_SECS {
        tracing::warn!(
            requested = value,
            min = MIN_TICK_INTERVAL_SECS,
            "tick_interval_secs below minimum, clamping to {}",
            MIN_TICK_INTERVAL_SECS
        );
        MIN_TICK_INTERVAL_SECS
    } else {
        value
    }
}

/// Default log directory (~/.arrivalseq/logs).
pub fn default_log_directory() -> PathBuf {
    super::file::config_directory().join("logs")
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            stability: StabilitySettings {
                minimum_unstable_secs: DEFAULT_MINIMUM_UNSTABLE_SECS,
                stable_threshold_secs: DEFAULT_STABLE_THRESHOLD_SECS,
                frozen_threshold_secs: DEFAULT_FROZEN_THRESHOLD_SECS,
            },
            estimation: EstimationSettings {
                trajectory_range_nm: DEFAULT_TRAJECTORY_RANGE_NM,
                creation_threshold_secs: DEFAULT_CREATION_THRESHOLD_SECS,
            },
            cleanup: CleanupSettings {
                max_landed_flights: DEFAULT_MAX_LANDED_FLIGHTS,
                landed_timeout_secs: DEFAULT_LANDED_TIMEOUT_SECS,
                lost_timeout_secs: DEFAULT_LOST_TIMEOUT_SECS,
            },
            scheduler: SchedulerSettings {
                tick_interval_secs: DEFAULT_TICK_INTERVAL_SECS,
            },
            logging: LoggingSettings {
                directory: default_log_directory(),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
