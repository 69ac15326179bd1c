//! INI serialization logic for converting `SettingsFile` → INI string.
//!
//! Produces the commented INI representation written to `settings.ini`.

use std::path::Path;

use super::settings::SettingsFile;

/// Convert a `SettingsFile` to a commented INI string for saving.
pub(super) fn to_settings_string(config: &SettingsFile) -> String {
    format!(
        r#"[stability]
; Minimum time a newly activated flight stays Unstable (seconds)
minimum_unstable_secs = {}
; A flight becomes Stable when it is this close to its feeder fix (seconds)
stable_threshold_secs = {}
; A flight becomes Frozen when it is this close to landing (seconds)
frozen_threshold_secs = {}

[estimation]
; Inside this distance of the feeder fix the live trajectory estimate is used (nm)
trajectory_range_nm = {}
; Flights are created once their feeder fix estimate is within this window (seconds)
creation_threshold_secs = {}

[cleanup]
; Number of Landed flights kept in the sequence
max_landed_flights = {}
; Landed flights are removed after this long (seconds)
landed_timeout_secs = {}
; Flights with no position report for this long are removed (seconds)
lost_timeout_secs = {}

[scheduler]
; Interval between recalculations (seconds, minimum 1)
tick_interval_secs = {}

[logging]
; Directory for log files
directory = {}
; Log file name
file = {}
"#,
        config.stability.minimum_unstable_secs,
        config.stability.stable_threshold_secs,
        config.stability.frozen_threshold_secs,
        config.estimation.trajectory_range_nm,
        config.estimation.creation_threshold_secs,
        config.cleanup.max_landed_flights,
        config.cleanup.landed_timeout_secs,
        config.cleanup.lost_timeout_secs,
        config.scheduler.tick_interval_secs,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::settings::SettingsFile;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.ini");

        let mut config = SettingsFile::default();
        config.stability.frozen_threshold_secs = 720;
        config.estimation.trajectory_range_nm = 42.5;
        config.cleanup.max_landed_flights = 2;
        config.scheduler.tick_interval_secs = 10;
        config.logging.directory = PathBuf::from("/tmp/arrivalseq-logs");

        config.save_to(&path).unwrap();
        let loaded = SettingsFile::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_written_file_is_commented() {
        let content = super::to_settings_string(&SettingsFile::default());
        assert!(content.contains("[stability]"));
        assert!(content.contains("; Number of Landed flights kept"));
        assert!(content.contains("max_landed_flights = 5"));
    }
}
