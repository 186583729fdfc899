mod archive;
mod device;
mod pool;
mod session;

pub use {
    archive::Archiver,
    device::{DeviceBackend, DeviceKind, DeviceMonitor, DeviceSelection, DeviceWriter},
    pool::WorkerPool,
    session::{
        ARCHIVE_EXTENSION, DEFAULT_TIMESTAMP_FORMAT, LOG_EXTENSION, OverwritePrompt, Readiness,
        RecordingSession, SessionId, SessionRequest,
    },
};
