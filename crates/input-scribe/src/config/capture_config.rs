use crate::config::{default_poll_interval_ms, default_timestamp_format};

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Device capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Record keyboard input.
    #[serde(default = "default_true")]
    pub keyboard: bool,
    /// Record mouse input (implies screen geometry capture).
    #[serde(default = "default_true")]
    pub mouse: bool,
    /// Record gamepad input.
    #[serde(default)]
    pub gamepad: bool,
    /// Sampling interval for the screen and gamepad monitors.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// `chrono` format string for the session identifier's timestamp.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            keyboard: true,
            mouse: true,
            gamepad: false,
            poll_interval_ms: default_poll_interval_ms(),
            timestamp_format: default_timestamp_format(),
        }
    }
}
