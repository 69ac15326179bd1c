//! INI parsing logic for converting `Ini` → `SettingsFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::clamp_tick_interval;
use super::file::ConfigFileError;
use super::settings::SettingsFile;

/// Parse an `Ini` object into a `SettingsFile`.
///
/// Starts from `SettingsFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<SettingsFile, ConfigFileError> {
    let mut config = SettingsFile::default();

    // [stability] section
    if let Some(section) = ini.section(Some("stability")) {
        if let Some(v) = parse_value(section, "stability", "minimum_unstable_secs", SECONDS)? {
            config.stability.minimum_unstable_secs = v;
        }
        if let Some(v) = parse_value(section, "stability", "stable_threshold_secs", SECONDS)? {
            config.stability.stable_threshold_secs = v;
        }
        if let Some(v) = parse_value(section, "stability", "frozen_threshold_secs", SECONDS)? {
            config.stability.frozen_threshold_secs = v;
        }
    }

    // [estimation] section
    if let Some(section) = ini.section(Some("estimation")) {
        if let Some(v) = section.get("trajectory_range_nm") {
            let range: f64 = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "estimation".to_string(),
                key: "trajectory_range_nm".to_string(),
                value: v.to_string(),
                reason: "must be a number (nautical miles)".to_string(),
            })?;
            if !range.is_finite() || range < 0.0 {
                return Err(ConfigFileError::InvalidValue {
                    section: "estimation".to_string(),
                    key: "trajectory_range_nm".to_string(),
                    value: v.to_string(),
                    reason: "must not be negative".to_string(),
                });
            }
            config.estimation.trajectory_range_nm = range;
        }
        if let Some(v) = parse_value(section, "estimation", "creation_threshold_secs", SECONDS)? {
            config.estimation.creation_threshold_secs = v;
        }
    }

    // [cleanup] section
    if let Some(section) = ini.section(Some("cleanup")) {
        if let Some(v) = parse_value(
            section,
            "cleanup",
            "max_landed_flights",
            "must be a non-negative integer",
        )? {
            config.cleanup.max_landed_flights = v;
        }
        if let Some(v) = parse_value(section, "cleanup", "landed_timeout_secs", SECONDS)? {
            config.cleanup.landed_timeout_secs = v;
        }
        if let Some(v) = parse_value(section, "cleanup", "lost_timeout_secs", SECONDS)? {
            config.cleanup.lost_timeout_secs = v;
        }
    }

    // [scheduler] section
    if let Some(section) = ini.section(Some("scheduler")) {
        if let Some(v) = parse_value(section, "scheduler", "tick_interval_secs", SECONDS)? {
            config.scheduler.tick_interval_secs = clamp_tick_interval(v);
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

const SECONDS: &str = "must be a non-negative integer (seconds)";

/// Parse an optional key, mapping failures to `InvalidValue`.
fn parse_value<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    let Some(raw) = section.get(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section_name.to_string(),
            key: key.to_string(),
            value: raw.to_string(),
            reason: reason.to_string(),
        })
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
