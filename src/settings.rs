//! Decoder settings persistence.
//!
//! Settings live in a JSON file in the platform config directory and carry
//! the header layout used to decode exports.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::parsers::HeaderSchema;

const SETTINGS_FILE_NAME: &str = "settings.json";

/// Errors that can occur while reading or writing settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read settings file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to write settings file {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Invalid settings file {0}: {1}")]
    Parse(PathBuf, serde_json::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(serde_json::Error),
}

/// Settings that persist across runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Header layout of the exports being decoded
    #[serde(default)]
    pub schema: HeaderSchema,
}

fn default_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            schema: HeaderSchema::default(),
        }
    }
}

impl Settings {
    /// Get the config directory path for vcdslog
    pub fn get_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vcdslog"))
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join(SETTINGS_FILE_NAME))
    }

    /// Load settings from the config directory, falling back to defaults
    /// when the file is missing or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::get_settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::Read(path.to_path_buf(), e))?;
        serde_json::from_str(&content).map_err(|e| SettingsError::Parse(path.to_path_buf(), e))
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::get_settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to an explicit file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::Write(parent.to_path_buf(), e))?;
        }

        let content = serde_json::to_string_pretty(self).map_err(SettingsError::Serialize)?;
        std::fs::write(path, content).map_err(|e| SettingsError::Write(path.to_path_buf(), e))
    }
}
