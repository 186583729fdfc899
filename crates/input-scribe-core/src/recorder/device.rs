use crate::CoreResult;

use std::{fmt, path::Path, sync::Arc};

/// A capturable device.
///
/// Declaration order is the canonical order in which devices are
/// started, stopped, and added to the session archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceKind {
    /// Keyboard key presses and releases.
    Keyboard,
    /// Mouse movement, buttons, and wheel.
    Mouse,
    /// Screen geometry samples; always recorded alongside the mouse so
    /// that mouse coordinates can be mapped back to the display.
    Screen,
    /// Gamepad buttons and axes.
    Gamepad,
}

impl DeviceKind {
    /// Fixed file name for this device's log in the staging directory.
    pub fn staging_file_name(self) -> &'static str {
        match self {
            DeviceKind::Keyboard => "keyboard.csv",
            DeviceKind::Mouse => "mouse.csv",
            DeviceKind::Screen => "screen.csv",
            DeviceKind::Gamepad => "gamepad.csv",
        }
    }

    /// Device-specific suffix used in archive entry names.
    pub fn entry_suffix(self) -> &'static str {
        match self {
            DeviceKind::Keyboard => "keyboard",
            DeviceKind::Mouse => "mouse",
            DeviceKind::Screen => "screen",
            DeviceKind::Gamepad => "gamepad",
        }
    }

    /// Whether this device is sampled by a background polling monitor
    /// rather than fed by event hooks.
    pub fn is_polling(self) -> bool {
        matches!(self, DeviceKind::Screen | DeviceKind::Gamepad)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entry_suffix())
    }
}

/// The caller's device toggles for one recording.
///
/// Screen capture is not toggled directly: it is implied by mouse
/// capture, mirroring the pairing in [`kinds`](Self::kinds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceSelection {
    /// Record keyboard input.
    pub keyboard: bool,
    /// Record mouse input (implies screen geometry capture).
    pub mouse: bool,
    /// Record gamepad input.
    pub gamepad: bool,
}

impl DeviceSelection {
    /// No device toggled at all.
    pub fn is_empty(&self) -> bool {
        !self.keyboard && !self.mouse && !self.gamepad
    }

    /// Expands the toggles into the device kinds to start, in canonical
    /// order. Selecting the mouse yields both `Mouse` and `Screen`.
    pub fn kinds(&self) -> Vec<DeviceKind> {
        let mut kinds = Vec::with_capacity(4);
        if self.keyboard {
            kinds.push(DeviceKind::Keyboard);
        }
        if self.mouse {
            kinds.push(DeviceKind::Mouse);
            kinds.push(DeviceKind::Screen);
        }
        if self.gamepad {
            kinds.push(DeviceKind::Gamepad);
        }
        kinds
    }
}

/// Persists one device's captured events to a file.
///
/// Implementations live outside the core; the session only relies on
/// this contract: `start` opens the output location (failing with an
/// I/O error if it cannot), `stop` flushes and releases it (called at
/// most once per instance), and `file_location` is stable after a
/// successful `start`.
pub trait DeviceWriter: Send {
    /// Open the output file and begin accepting events.
    fn start(&mut self) -> CoreResult<()>;

    /// Flush and release the output file.
    fn stop(&mut self) -> CoreResult<()>;

    /// Location the writer produces its output at.
    fn file_location(&self) -> &Path;
}

/// Background sampling loop feeding a paired [`DeviceWriter`].
///
/// Once submitted to the [`WorkerPool`](crate::WorkerPool), `run` polls
/// the device at an implementation-defined interval until `stop` is
/// observed, then terminates within at most one polling interval. A
/// monitor is never restarted.
pub trait DeviceMonitor: Send + Sync {
    /// Poll the device until the stop flag is observed.
    fn run(&self);

    /// Signal the polling loop to terminate.
    fn stop(&self);
}

/// Boundary to the platform capture layer.
///
/// The session asks the backend for a writer per selected device, a
/// paired monitor for polling devices, and gamepad presence for the
/// readiness gate. Implementations pair each monitor with the writer
/// most recently constructed for the same kind.
pub trait DeviceBackend: Send {
    /// Construct the writer for `kind`, targeting `staging_path`.
    fn writer(&self, kind: DeviceKind, staging_path: &Path) -> Box<dyn DeviceWriter>;

    /// Construct the paired monitor for a polling `kind`. Returns
    /// `None` for kinds without a monitor or when the device cannot be
    /// opened for sampling.
    fn monitor(&self, kind: DeviceKind) -> Option<Arc<dyn DeviceMonitor>>;

    /// Whether a physical gamepad is currently detected.
    fn gamepad_present(&self) -> bool;
}
