use crate::devices::Sampler;

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

/// Samples the primary display's geometry, emitting a line whenever it
/// changes (and once for the initial state).
///
/// Mouse coordinates are absolute, so resolution changes mid-session
/// are needed to interpret the mouse log afterwards.
pub struct ScreenSampler {
    last: Option<(u64, u64)>,
}

impl ScreenSampler {
    /// Create a sampler with no prior observation.
    pub fn new() -> Self {
        Self { last: None }
    }
}

impl Default for ScreenSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for ScreenSampler {
    fn sample(&mut self) -> Vec<String> {
        let size = match rdev::display_size() {
            Ok(size) => size,
            Err(e) => {
                debug!(error = ?e, "Display size query failed");
                return Vec::new();
            }
        };

        if self.last == Some(size) {
            return Vec::new();
        }
        self.last = Some(size);

        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        vec![format!("{ts},{},{}", size.0, size.1)]
    }
}
