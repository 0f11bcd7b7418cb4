//! Loading and saving `~/.fieldcover/config.ini`.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or is not valid INI.
    #[error("Failed to read config file: {0}")]
    Read(#[from] ini::Error),

    #[error("Failed to write config file: {0}")]
    Write(String),

    #[error("Failed to create config directory: {0}")]
    Directory(std::io::Error),

    /// A value in the file is unusable.
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// `section.key` does not name a setting.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// A value given for a key failed validation.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

impl ConfigFile {
    /// Load from `~/.fieldcover/config.ini`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save to `~/.fieldcover/config.ini`.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Directory)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigError::Write(e.to_string()))
    }

    /// Write the default config file if none exists. Returns its path.
    pub fn ensure_exists() -> Result<PathBuf, ConfigError> {
        Self::ensure_exists_at(&config_file_path())
    }

    pub(crate) fn ensure_exists_at(path: &Path) -> Result<PathBuf, ConfigError> {
        if !path.exists() {
            Self::default().save_to(path)?;
            tracing::info!(path = %path.display(), "Created default config file");
        }
        Ok(path.to_path_buf())
    }
}

/// `~/.fieldcover`, or `./.fieldcover` when no home directory is known.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fieldcover")
}

/// `~/.fieldcover/config.ini`.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
