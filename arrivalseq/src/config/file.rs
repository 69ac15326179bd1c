//! Settings file handling for ~/.arrivalseq/settings.ini.
//!
//! Loads and saves engine settings with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use super::defaults::*;
pub use super::settings::*;

/// Settings file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read settings file
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write settings file
    #[error("Failed to write settings file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create settings directory
    #[error("Failed to create settings directory: {0}")]
    DirectoryError(std::io::Error),
}

impl SettingsFile {
    /// Load settings from the default path (~/.arrivalseq/settings.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&settings_file_path())
    }

    /// Load settings from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_settings_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Render the settings as commented INI text, as `save_to` writes them.
    pub fn to_ini_string(&self) -> String {
        super::writer::to_settings_string(self)
    }

    /// Create the default settings file if it doesn't exist.
    ///
    /// Returns the path to the settings file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = settings_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }
}

/// Get the path to the settings directory (~/.arrivalseq).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".arrivalseq")
}

/// Get the path to the settings file (~/.arrivalseq/settings.ini).
pub fn settings_file_path() -> PathBuf {
    config_directory().join("settings.ini")
}
