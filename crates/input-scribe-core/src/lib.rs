//! Input-scribe Core Library
//!
//! Session lifecycle management for bounded input recordings: a
//! [`RecordingSession`] starts one capture writer per selected device,
//! runs polling monitors on a small worker pool, and bundles every
//! output file into a single zip archive on stop.
//!
//! # Example
//!
//! ```no_run
//! use input_scribe_core::{
//!     CoreResult, DeviceBackend, DeviceSelection, OverwritePrompt, Readiness,
//!     RecordingSession, SessionRequest,
//! };
//!
//! fn record(backend: Box<dyn DeviceBackend>, prompt: &mut dyn OverwritePrompt) -> CoreResult<()> {
//!     let mut session = RecordingSession::new(backend, "%Y-%m-%d_%H-%M-%S")?;
//!
//!     let request = SessionRequest {
//!         save_directory: "/home/alice/records".into(),
//!         user_name: "alice".into(),
//!         record_name: "demo".into(),
//!         selection: DeviceSelection {
//!             keyboard: true,
//!             mouse: true,
//!             gamepad: false,
//!         },
//!     };
//!
//!     match session.check_readiness(&request, prompt) {
//!         Readiness::Ready { session_id } => {
//!             session.start(session_id, &request.save_directory, &request.selection);
//!         }
//!         Readiness::Rejected { errors } => eprintln!("{}", errors.join("\n")),
//!         Readiness::Cancelled => {}
//!     }
//!
//!     // ... later, or during application teardown:
//!     session.force_stop_if_recording();
//!     Ok(())
//! }
//! ```

mod error;
mod recorder;

pub use {
    error::{RecorderError, Result as CoreResult},
    recorder::{
        ARCHIVE_EXTENSION, Archiver, DEFAULT_TIMESTAMP_FORMAT, DeviceBackend, DeviceKind,
        DeviceMonitor, DeviceSelection, DeviceWriter, LOG_EXTENSION, OverwritePrompt, Readiness,
        RecordingSession, SessionId, SessionRequest, WorkerPool,
    },
};
