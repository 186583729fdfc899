mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod session_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, session_config::SessionConfig,
};

pub(crate) const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

pub(crate) fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

pub(crate) fn default_timestamp_format() -> String {
    input_scribe_core::DEFAULT_TIMESTAMP_FORMAT.to_string()
}
