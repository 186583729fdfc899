//! Linux joydev gamepad capture.
//!
//! The kernel's joystick interface exposes `/dev/input/js*` device
//! nodes delivering fixed 8-byte event records. Presence of such a
//! node is the readiness gate's "gamepad found" signal; the sampler
//! drains pending records non-blockingly on each poll tick. Other
//! platforms report no gamepad, so the readiness gate rejects gamepad
//! selection there.

#[cfg(target_os = "linux")]
pub use linux::{GamepadSampler, gamepad_present};

#[cfg(not(target_os = "linux"))]
pub use fallback::{GamepadSampler, gamepad_present};

#[cfg(target_os = "linux")]
mod linux {
    use crate::devices::Sampler;

    use std::{
        fs::File,
        io::Read,
        os::unix::fs::OpenOptionsExt,
        path::PathBuf,
        time::{SystemTime, UNIX_EPOCH},
    };

    use tracing::{debug, info};

    /// Size of one joydev event record.
    const JS_EVENT_SIZE: usize = 8;

    fn first_joystick_node() -> Option<PathBuf> {
        let entries = std::fs::read_dir("/dev/input").ok()?;
        let mut nodes: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| {
                        name.starts_with("js") && name[2..].chars().all(|c| c.is_ascii_digit())
                    })
            })
            .collect();
        nodes.sort();
        nodes.into_iter().next()
    }

    /// Whether a joystick device node is present.
    pub fn gamepad_present() -> bool {
        first_joystick_node().is_some()
    }

    /// Non-blocking reader of joydev event records.
    pub struct GamepadSampler {
        device: File,
    }

    impl GamepadSampler {
        /// Open the first joystick node, if any.
        pub fn open() -> Option<Self> {
            let node = first_joystick_node()?;
            let device = std::fs::OpenOptions::new()
                .read(true)
                .custom_flags(libc::O_NONBLOCK)
                .open(&node)
                .ok()?;

            info!(node = %node.display(), "Gamepad opened");

            Some(Self { device })
        }
    }

    impl Sampler for GamepadSampler {
        fn sample(&mut self) -> Vec<String> {
            let ts = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);

            let mut lines = Vec::new();
            let mut record = [0u8; JS_EVENT_SIZE];

            loop {
                match self.device.read_exact(&mut record) {
                    Ok(()) => {
                        // struct js_event { __u32 time; __s16 value; __u8 type; __u8 number; }
                        let value = i16::from_le_bytes([record[4], record[5]]);
                        let event_type = record[6];
                        let number = record[7];
                        lines.push(format!("{ts},{event_type},{number},{value}"));
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                    Err(e) => {
                        debug!(error = %e, "Gamepad read failed");
                        break;
                    }
                }
            }

            lines
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod fallback {
    use crate::devices::Sampler;

    /// No joydev interface on this platform.
    pub fn gamepad_present() -> bool {
        false
    }

    /// Stub sampler; never constructed because no gamepad is detected.
    pub struct GamepadSampler;

    impl GamepadSampler {
        /// Always `None`: there is no gamepad device to open.
        pub fn open() -> Option<Self> {
            None
        }
    }

    impl Sampler for GamepadSampler {
        fn sample(&mut self) -> Vec<String> {
            Vec::new()
        }
    }
}
