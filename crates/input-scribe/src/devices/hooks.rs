//! Global keyboard and mouse hooks.
//!
//! One `rdev::listen` thread runs for the process lifetime — rdev has
//! no unlisten — gated by an atomic capturing flag, so events are only
//! routed to the device sinks while a session is recording.

use crate::devices::SinkRegistry;

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

use input_scribe_core::DeviceKind;
use tracing::{error, info};

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

fn format_event(event_type: &rdev::EventType) -> Option<(DeviceKind, String)> {
    let ts = timestamp_ms();
    match event_type {
        rdev::EventType::KeyPress(key) => {
            Some((DeviceKind::Keyboard, format!("{ts},pressed,{key:?}")))
        }
        rdev::EventType::KeyRelease(key) => {
            Some((DeviceKind::Keyboard, format!("{ts},released,{key:?}")))
        }
        rdev::EventType::ButtonPress(button) => {
            Some((DeviceKind::Mouse, format!("{ts},pressed,{button:?},,")))
        }
        rdev::EventType::ButtonRelease(button) => {
            Some((DeviceKind::Mouse, format!("{ts},released,{button:?},,")))
        }
        rdev::EventType::MouseMove { x, y } => {
            Some((DeviceKind::Mouse, format!("{ts},moved,,{x},{y}")))
        }
        rdev::EventType::Wheel { delta_x, delta_y } => Some((
            DeviceKind::Mouse,
            format!("{ts},wheel,,{delta_x},{delta_y}"),
        )),
    }
}

/// Handle to the global input listener.
pub struct InputHooks {
    capturing: Arc<AtomicBool>,
}

impl InputHooks {
    /// Spawn the listener thread routing events into `registry`.
    pub fn spawn(registry: SinkRegistry) -> Self {
        let capturing = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&capturing);

        let spawned = std::thread::Builder::new()
            .name("input-hooks".to_string())
            .spawn(move || {
                info!("Input hook listener started");

                let callback = move |event: rdev::Event| {
                    if !flag.load(Ordering::Acquire) {
                        return;
                    }

                    if let Some((kind, line)) = format_event(&event.event_type) {
                        let registry = registry.lock().unwrap_or_else(|e| e.into_inner());
                        if let Some(sink) = registry.get(&kind) {
                            sink.append(&line);
                        }
                    }
                };

                if let Err(e) = rdev::listen(callback) {
                    error!(error = ?e, "Input hook listener failed");
                }
            });

        if let Err(e) = spawned {
            error!(error = %e, "Failed to spawn input hook thread");
        }

        Self { capturing }
    }

    /// Route events to the sinks (call when a session starts).
    pub fn enable(&self) {
        self.capturing.store(true, Ordering::Release);
    }

    /// Stop routing events (call when a session stops).
    pub fn disable(&self) {
        self.capturing.store(false, Ordering::Release);
    }
}
