use crate::{
    CoreResult, RecorderError,
    recorder::{Archiver, DeviceBackend, DeviceKind, DeviceMonitor, DeviceSelection, DeviceWriter},
    recorder::pool::WorkerPool,
};

use std::{
    collections::BTreeMap,
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// File extension of the session archive.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// File extension of the per-device log entries inside the archive.
pub const LOG_EXTENSION: &str = "csv";

/// Default `chrono` format for the session identifier's timestamp.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Directory name for staging files under the process temp directory.
const STAGING_DIR_NAME: &str = "input-scribe";

/// Canonical identifier of one recording session:
/// `<timestamp>.<userName>.<recordName>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    fn new(timestamp_format: &str, user_name: &str, record_name: &str) -> Self {
        let timestamp = chrono::Local::now().format(timestamp_format);
        Self(format!("{timestamp}.{user_name}.{record_name}"))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the session archive: `<id>.zip`.
    pub fn archive_file_name(&self) -> String {
        format!("{}.{ARCHIVE_EXTENSION}", self.0)
    }

    /// Archive entry name for one device's log: `<id>.<device>.csv`.
    pub fn entry_name(&self, kind: DeviceKind) -> String {
        format!("{}.{}.{LOG_EXTENSION}", self.0, kind.entry_suffix())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inputs to the readiness gate, as collected by the caller's form.
#[derive(Debug, Clone, Default)]
pub struct SessionRequest {
    /// Directory the final archive is written to.
    pub save_directory: String,
    /// User name embedded in the session identifier.
    pub user_name: String,
    /// Record name embedded in the session identifier.
    pub record_name: String,
    /// Devices toggled for capture.
    pub selection: DeviceSelection,
}

/// Outcome of the readiness gate.
///
/// `Rejected` and `Cancelled` are observably distinct: a rejection
/// carries the complete batch of validation errors for the caller to
/// surface together, while a cancellation (the user declining to
/// overwrite an existing archive) is a silent no-op.
#[derive(Debug)]
pub enum Readiness {
    /// The session may start under the given identifier.
    Ready {
        /// Identifier computed for this session.
        session_id: SessionId,
    },
    /// Validation failed; every violation is reported together.
    Rejected {
        /// Human-readable error reasons, in check order.
        errors: Vec<String>,
    },
    /// An archive with the computed identifier already exists and the
    /// user declined to overwrite it.
    Cancelled,
}

/// Confirmation hook invoked when the computed archive path already
/// exists. Owned by the caller's UI layer; the core only consumes the
/// yes/no answer.
pub trait OverwritePrompt {
    /// Ask whether `archive_path` may be overwritten.
    fn confirm_overwrite(&mut self, archive_path: &Path) -> bool;
}

/// Orchestrates one bounded recording: owns the active writers and
/// monitors, gates session start behind validation, and archives every
/// output on stop.
///
/// Exactly one session is live at a time and all operations must be
/// called from a single thread; the caller serializes start/stop (the
/// UI does so by disabling its start controls while recording).
pub struct RecordingSession {
    backend: Box<dyn DeviceBackend>,
    pool: WorkerPool,
    staging_dir: PathBuf,
    timestamp_format: String,
    save_directory: PathBuf,
    session_id: Option<SessionId>,
    writers: BTreeMap<DeviceKind, Box<dyn DeviceWriter>>,
    monitors: BTreeMap<DeviceKind, Arc<dyn DeviceMonitor>>,
}

impl RecordingSession {
    /// Create an idle session over the given capture backend.
    ///
    /// Staging files go to a fixed `input-scribe` directory under the
    /// process temp directory, created here if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the staging directory cannot be created or
    /// the worker pool cannot be spawned.
    #[track_caller]
    pub fn new(
        backend: Box<dyn DeviceBackend>,
        timestamp_format: impl Into<String>,
    ) -> CoreResult<Self> {
        let staging_dir = std::env::temp_dir().join(STAGING_DIR_NAME);
        std::fs::create_dir_all(&staging_dir).map_err(|e| RecorderError::StagingUnavailable {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self {
            backend,
            pool: WorkerPool::new()?,
            staging_dir,
            timestamp_format: timestamp_format.into(),
            save_directory: PathBuf::new(),
            session_id: None,
            writers: BTreeMap::new(),
            monitors: BTreeMap::new(),
        })
    }

    /// Redirect staging files to `dir` instead of the process temp
    /// directory. The directory must already exist.
    pub fn set_staging_dir(&mut self, dir: PathBuf) {
        self.staging_dir = dir;
    }

    /// Whether at least one device writer is currently active.
    pub fn is_recording(&self) -> bool {
        !self.writers.is_empty()
    }

    /// The devices actively being recorded, in canonical order.
    pub fn active_devices(&self) -> Vec<DeviceKind> {
        self.writers.keys().copied().collect()
    }

    /// Validate whether a session may start, accumulating every
    /// violation rather than failing fast.
    ///
    /// When validation passes, the session identifier is computed and
    /// checked against an existing archive at the save directory; the
    /// prompt decides whether overwriting is acceptable.
    #[instrument(skip_all)]
    pub fn check_readiness(
        &self,
        request: &SessionRequest,
        prompt: &mut dyn OverwritePrompt,
    ) -> Readiness {
        let mut errors = Vec::new();

        if request.save_directory.is_empty() {
            errors.push("no save directory".to_string());
        } else if !Path::new(&request.save_directory).exists() {
            errors.push("invalid save directory".to_string());
        }

        if request.user_name.is_empty() {
            errors.push("no user name".to_string());
        }

        if request.record_name.is_empty() {
            errors.push("no record name".to_string());
        }

        if request.selection.is_empty() {
            errors.push("no device selected".to_string());
        }

        if request.selection.gamepad && !self.backend.gamepad_present() {
            errors.push("no gamepad found".to_string());
        }

        if !errors.is_empty() {
            warn!(?errors, "Session not ready");
            return Readiness::Rejected { errors };
        }

        let session_id = SessionId::new(
            &self.timestamp_format,
            &request.user_name,
            &request.record_name,
        );

        let archive_path = Path::new(&request.save_directory).join(session_id.archive_file_name());
        if archive_path.exists() && !prompt.confirm_overwrite(&archive_path) {
            info!(session_id = %session_id, "Overwrite declined, session not started");
            return Readiness::Cancelled;
        }

        debug!(session_id = %session_id, "Session ready");

        Readiness::Ready { session_id }
    }

    /// Start recording the selected devices.
    ///
    /// Each device is attempted independently: a writer that fails to
    /// start, or a polling device whose monitor cannot be obtained or
    /// submitted, is logged and excluded without aborting the others.
    /// The session is recording afterwards iff at least one writer
    /// survived.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub fn start(
        &mut self,
        session_id: SessionId,
        save_directory: impl AsRef<Path>,
        selection: &DeviceSelection,
    ) {
        if self.is_recording() {
            warn!("Start requested while already recording, ignoring");
            return;
        }

        self.save_directory = save_directory.as_ref().to_path_buf();

        for kind in selection.kinds() {
            let staging_path = self.staging_dir.join(kind.staging_file_name());
            let mut writer = self.backend.writer(kind, &staging_path);

            if let Err(e) = writer.start() {
                error!(device = %kind, error = %e, "Writer failed to start, excluding device");
                continue;
            }

            if kind.is_polling() {
                let Some(monitor) = self.backend.monitor(kind) else {
                    error!(device = %kind, "No monitor available, excluding device");
                    if let Err(e) = writer.stop() {
                        error!(device = %kind, error = %e, "Failed to stop orphaned writer");
                    }
                    continue;
                };

                if let Err(e) = self.pool.submit(Arc::clone(&monitor)) {
                    error!(device = %kind, error = %e, "Monitor submission failed, excluding device");
                    if let Err(e) = writer.stop() {
                        error!(device = %kind, error = %e, "Failed to stop orphaned writer");
                    }
                    continue;
                }

                self.monitors.insert(kind, monitor);
            }

            self.writers.insert(kind, writer);
        }

        if self.is_recording() {
            self.session_id = Some(session_id);
            info!(devices = ?self.active_devices(), "Recording started");
        } else {
            warn!("No device started, session remains idle");
        }
    }

    /// Stop every active writer and monitor and archive their outputs
    /// to `saveDirectory/<sessionId>.zip`.
    ///
    /// Archive I/O failures are logged, not propagated: the session
    /// always returns to idle with its writer and monitor maps cleared.
    /// Calling this while idle is a no-op.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        if self.writers.is_empty() {
            debug!("Stop requested with no active writers");
            return;
        }

        let Some(session_id) = self.session_id.take() else {
            // Writers without an identifier cannot happen through the
            // public API; drop them defensively.
            self.writers.clear();
            self.monitors.clear();
            return;
        };

        let mut entries: Vec<(PathBuf, String)> = Vec::with_capacity(self.writers.len());

        // BTreeMap iteration order is the canonical device order.
        for (kind, writer) in &mut self.writers {
            if let Err(e) = writer.stop() {
                error!(device = %kind, error = %e, "Writer failed to stop");
            }
            entries.push((writer.file_location().to_path_buf(), session_id.entry_name(*kind)));

            if let Some(monitor) = self.monitors.get(kind) {
                monitor.stop();
            }
        }

        let archive_path = self.save_directory.join(session_id.archive_file_name());
        if let Err(e) = Self::write_archive(&archive_path, &entries) {
            error!(path = %archive_path.display(), error = %e, "Failed to build session archive");
        } else {
            info!(path = %archive_path.display(), entries = entries.len(), "Session archived");
        }

        self.writers.clear();
        self.monitors.clear();

        info!(session_id = %session_id, "Recording stopped");
    }

    /// Stop and archive if currently recording, then shut the worker
    /// pool down.
    ///
    /// Invoked by the owning application shell during its own teardown
    /// so a forcibly closed application never leaves writers open or
    /// outputs unarchived. The pool accepts no submissions afterwards.
    #[instrument(skip(self))]
    pub fn force_stop_if_recording(&mut self) {
        if self.is_recording() {
            info!("Forced stop while recording");
            self.stop();
        }

        self.pool.shutdown();
    }

    fn write_archive(archive_path: &Path, entries: &[(PathBuf, String)]) -> CoreResult<()> {
        let mut archiver = Archiver::create(archive_path)?;
        for (source, entry_name) in entries {
            archiver.add_file(source, entry_name)?;
        }
        archiver.finish()
    }
}
