use crate::recorder::DeviceKind;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recording session errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// A device writer failed to open, write, or release its output file.
    #[error("{device} writer I/O error: {source} {location}")]
    WriterIo {
        /// Device whose writer failed.
        device: DeviceKind,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Worker pool threads could not be spawned.
    #[error("Worker pool spawn failed: {source} {location}")]
    PoolSpawn {
        /// Underlying I/O error from thread creation.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Task submitted after the worker pool was shut down.
    #[error("Worker pool is closed {location}")]
    PoolClosed {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Building or writing the session archive failed.
    #[error("Archive error: {reason} {location}")]
    Archive {
        /// Description of the archive failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The staging directory for device log files could not be created.
    #[error("Staging directory unavailable: {source} {location}")]
    StagingUnavailable {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
