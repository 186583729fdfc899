//! Configuration management for input-scribe.
//!
//! Handles loading and saving TOML configuration files with
//! cross-platform paths and atomic write operations. The session
//! section persists the three form fields between runs, matching the
//! preference semantics of the recording UI: absent values load as
//! blank, and blank values are only rejected by the readiness gate.

use crate::{
    AppError, AppResult,
    config::{CaptureConfig, SessionConfig},
};

use std::{fs, io::Write, panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Persisted session form fields.
    #[serde(default)]
    pub session: SessionConfig,
    /// Device capture settings.
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    ///
    /// Field-level validation is intentionally absent: blank session
    /// fields are legal here and only matter once a recording is
    /// requested, where the readiness gate reports them all at once.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent
    /// corruption if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, &config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs =
            directories::ProjectDirs::from("com", "input-scribe", "Input-Scribe").ok_or_else(
                || AppError::ConfigError {
                    reason: "Failed to get config directory".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
            )?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to create config directory: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        Ok(config_dir.join("config.toml"))
    }
}
