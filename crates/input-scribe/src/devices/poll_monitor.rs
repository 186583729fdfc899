use crate::devices::EventSink;

use std::{
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use input_scribe_core::{DeviceKind, DeviceMonitor};
use tracing::info;

/// Samples the device state once per poll tick.
///
/// This is the boundary to the platform capture layer: each call
/// returns zero or more CSV lines to append to the paired device log.
pub trait Sampler: Send {
    /// Take one sample, returning the lines it produced.
    fn sample(&mut self) -> Vec<String>;
}

/// Generic [`DeviceMonitor`] driving a [`Sampler`] at a fixed interval.
///
/// The loop checks its stop flag once per tick, which bounds stop
/// latency to one polling interval.
pub struct PollingMonitor {
    kind: DeviceKind,
    sink: EventSink,
    interval: Duration,
    sampler: Mutex<Box<dyn Sampler>>,
    stopped: AtomicBool,
}

impl PollingMonitor {
    /// Create a monitor feeding `sink` from `sampler` every `interval`.
    pub fn new(
        kind: DeviceKind,
        sink: EventSink,
        interval: Duration,
        sampler: Box<dyn Sampler>,
    ) -> Self {
        Self {
            kind,
            sink,
            interval,
            sampler: Mutex::new(sampler),
            stopped: AtomicBool::new(false),
        }
    }
}

impl DeviceMonitor for PollingMonitor {
    fn run(&self) {
        info!(device = %self.kind, interval_ms = self.interval.as_millis() as u64, "Monitor started");

        while !self.stopped.load(Ordering::Acquire) {
            {
                let mut sampler = self.sampler.lock().unwrap_or_else(|e| e.into_inner());
                for line in sampler.sample() {
                    self.sink.append(&line);
                }
            }
            std::thread::sleep(self.interval);
        }

        info!(device = %self.kind, "Monitor stopped");
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }
}
