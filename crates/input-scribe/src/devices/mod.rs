mod gamepad;
mod hooks;
mod log_writer;
mod poll_monitor;
mod screen;

pub(crate) use {
    hooks::InputHooks,
    log_writer::{EventLogWriter, EventSink},
    poll_monitor::{PollingMonitor, Sampler},
    screen::ScreenSampler,
};

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use input_scribe_core::{DeviceBackend, DeviceKind, DeviceMonitor, DeviceWriter};
use tracing::warn;

/// Shared map from device kind to the sink of its current writer.
///
/// Written by [`SystemBackend`] as writers are constructed, read by the
/// input hook callback and by monitor pairing. Entries are replaced
/// wholesale on the next session; a sink whose writer has stopped
/// silently drops appends, so stale entries are harmless.
pub(crate) type SinkRegistry = Arc<Mutex<HashMap<DeviceKind, EventSink>>>;

/// Platform capture backend: file-backed CSV writers paired with
/// polling monitors for the screen and gamepad.
pub struct SystemBackend {
    registry: SinkRegistry,
    poll_interval: Duration,
}

impl SystemBackend {
    /// Create a backend polling monitors at `poll_interval`.
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            registry: Arc::new(Mutex::new(HashMap::new())),
            poll_interval,
        }
    }

    /// The sink registry, for wiring the global input hooks.
    pub fn registry(&self) -> SinkRegistry {
        Arc::clone(&self.registry)
    }
}

impl DeviceBackend for SystemBackend {
    fn writer(&self, kind: DeviceKind, staging_path: &Path) -> Box<dyn DeviceWriter> {
        let writer = EventLogWriter::new(kind, staging_path);
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(kind, writer.sink());
        Box::new(writer)
    }

    fn monitor(&self, kind: DeviceKind) -> Option<Arc<dyn DeviceMonitor>> {
        let sink = self
            .registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&kind)
            .cloned()?;

        match kind {
            DeviceKind::Screen => Some(Arc::new(PollingMonitor::new(
                kind,
                sink,
                self.poll_interval,
                Box::new(ScreenSampler::new()),
            ))),
            DeviceKind::Gamepad => match gamepad::GamepadSampler::open() {
                Some(sampler) => Some(Arc::new(PollingMonitor::new(
                    kind,
                    sink,
                    self.poll_interval,
                    Box::new(sampler),
                ))),
                None => {
                    warn!("Gamepad device could not be opened for sampling");
                    None
                }
            },
            _ => None,
        }
    }

    fn gamepad_present(&self) -> bool {
        gamepad::gamepad_present()
    }
}
