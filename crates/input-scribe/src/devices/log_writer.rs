use std::{
    fs::File,
    io::{BufWriter, Write},
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use error_location::ErrorLocation;
use input_scribe_core::{CoreResult, DeviceKind, DeviceWriter, RecorderError};
use tracing::{debug, info};

/// Cloneable append handle to a device log.
///
/// Hooks and monitors feed lines through this handle while the owning
/// [`EventLogWriter`] controls the file's lifetime. Once the writer has
/// stopped, appends are silently dropped; the capture side never fails
/// because a session ended first.
#[derive(Clone)]
pub struct EventSink {
    inner: Arc<Mutex<Option<BufWriter<File>>>>,
}

impl EventSink {
    fn closed() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Append one CSV line, dropping it if the log is not open.
    pub fn append(&self, line: &str) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(writer) = guard.as_mut() {
            if let Err(e) = writeln!(writer, "{line}") {
                debug!(error = %e, "Dropped event line");
            }
        }
    }
}

/// File-backed [`DeviceWriter`] producing one CSV log per device.
///
/// `start` creates the staging file and writes the device's header
/// line; events then stream in through the shared [`EventSink`].
pub struct EventLogWriter {
    kind: DeviceKind,
    path: PathBuf,
    header: &'static str,
    sink: EventSink,
}

impl EventLogWriter {
    /// CSV header for one device kind's log.
    pub fn header_for(kind: DeviceKind) -> &'static str {
        match kind {
            DeviceKind::Keyboard => "timestamp_ms,action,key",
            DeviceKind::Mouse => "timestamp_ms,action,detail,x,y",
            DeviceKind::Screen => "timestamp_ms,width,height",
            DeviceKind::Gamepad => "timestamp_ms,event_type,number,value",
        }
    }

    /// Create an unstarted writer targeting `path`.
    pub fn new(kind: DeviceKind, path: &Path) -> Self {
        Self {
            kind,
            path: path.to_path_buf(),
            header: Self::header_for(kind),
            sink: EventSink::closed(),
        }
    }

    /// Append handle for the capture side.
    pub fn sink(&self) -> EventSink {
        self.sink.clone()
    }
}

impl DeviceWriter for EventLogWriter {
    #[track_caller]
    fn start(&mut self) -> CoreResult<()> {
        let file = File::create(&self.path).map_err(|e| RecorderError::WriterIo {
            device: self.kind,
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", self.header).map_err(|e| RecorderError::WriterIo {
            device: self.kind,
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        *self.sink.inner.lock().unwrap_or_else(|e| e.into_inner()) = Some(writer);

        info!(device = %self.kind, path = %self.path.display(), "Device log opened");

        Ok(())
    }

    #[track_caller]
    fn stop(&mut self) -> CoreResult<()> {
        let writer = self.sink.inner.lock().unwrap_or_else(|e| e.into_inner()).take();

        if let Some(mut writer) = writer {
            writer.flush().map_err(|e| RecorderError::WriterIo {
                device: self.kind,
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;
            info!(device = %self.kind, "Device log closed");
        }

        Ok(())
    }

    fn file_location(&self) -> &Path {
        &self.path
    }
}
