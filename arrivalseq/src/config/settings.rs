//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI settings file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use chrono::Duration;

use crate::flight::StabilityThresholds;
use crate::sequence::CleanupPolicy;

/// Complete engine settings loaded from settings.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsFile {
    /// State machine thresholds
    pub stability: StabilitySettings,
    /// Estimate refinement and flight creation
    pub estimation: EstimationSettings,
    /// Eviction of landed and lost flights
    pub cleanup: CleanupSettings,
    /// Scheduling tick
    pub scheduler: SchedulerSettings,
    /// Log file location
    pub logging: LoggingSettings,
}

/// Flight state machine thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StabilitySettings {
    /// Minimum time a flight stays Unstable after activation, in seconds.
    pub minimum_unstable_secs: u64,
    /// Time to feeder fix at which a flight becomes Stable, in seconds.
    pub stable_threshold_secs: u64,
    /// Time to landing at which a flight becomes Frozen, in seconds.
    pub frozen_threshold_secs: u64,
}

impl StabilitySettings {
    /// Convert to the thresholds used by the state machine.
    pub fn thresholds(&self) -> StabilityThresholds {
        StabilityThresholds {
            minimum_unstable_duration: seconds(self.minimum_unstable_secs),
            stable_threshold: seconds(self.stable_threshold_secs),
            frozen_threshold: seconds(self.frozen_threshold_secs),
        }
    }
}

/// Estimate refinement settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationSettings {
    /// Distance from the feeder fix inside which the live trajectory replaces
    /// the system estimate, in nautical miles.
    pub trajectory_range_nm: f64,
    /// Flights are created once their feeder-fix estimate is this close, in seconds.
    pub creation_threshold_secs: u64,
}

impl EstimationSettings {
    pub fn creation_threshold(&self) -> Duration {
        seconds(self.creation_threshold_secs)
    }
}

/// Flight cleanup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupSettings {
    /// Maximum number of Landed flights kept in the sequence.
    pub max_landed_flights: usize,
    /// Landed flights older than this are evicted, in seconds.
    pub landed_timeout_secs: u64,
    /// Flights not seen for this long are evicted, in seconds.
    pub lost_timeout_secs: u64,
}

impl CleanupSettings {
    /// Convert to the policy applied by the sequence.
    pub fn policy(&self) -> CleanupPolicy {
        CleanupPolicy {
            max_landed_flights: self.max_landed_flights,
            landed_timeout: seconds(self.landed_timeout_secs),
            lost_timeout: seconds(self.lost_timeout_secs),
        }
    }
}

/// Scheduling tick settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Interval between scheduling ticks, in seconds.
    pub tick_interval_secs: u64,
}

impl SchedulerSettings {
    /// Tick interval for the daemon timer.
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.tick_interval_secs)
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory for log files.
    pub directory: PathBuf,
    /// Log file name.
    pub file: String,
}

fn seconds(value: u64) -> Duration {
    Duration::seconds(i64::try_from(value).unwrap_or(i64::MAX / 1000))
}
