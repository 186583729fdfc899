use crate::{CoreResult, RecorderError};

use std::{
    fs::File,
    io,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::debug;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Scoped zip builder for one session's output files.
///
/// Created against the final archive path, fed every (file, entry name)
/// pair, then finished. The underlying [`ZipWriter`] finalizes itself
/// on drop, so the archive is closed on every exit path, including when
/// an error aborts the add loop partway.
pub struct Archiver {
    zip: ZipWriter<File>,
    path: PathBuf,
}

impl Archiver {
    /// Create the archive file at `path`, truncating any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Archive`] if the file cannot be created.
    #[track_caller]
    pub fn create(path: &Path) -> CoreResult<Self> {
        let file = File::create(path).map_err(|e| RecorderError::Archive {
            reason: format!("Failed to create {}: {}", path.display(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(path = %path.display(), "Archive created");

        Ok(Self {
            zip: ZipWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Copy `source` into the archive under `entry_name`.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Archive`] if the source cannot be read
    /// or the entry cannot be written.
    #[track_caller]
    pub fn add_file(&mut self, source: &Path, entry_name: &str) -> CoreResult<()> {
        // Open the source before starting the entry so a missing file
        // leaves no empty stray entry behind.
        let mut file = File::open(source).map_err(|e| RecorderError::Archive {
            reason: format!("Failed to open {}: {}", source.display(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.zip
            .start_file(entry_name, SimpleFileOptions::default())
            .map_err(|e| RecorderError::Archive {
                reason: format!("Failed to start entry {}: {}", entry_name, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let bytes = io::copy(&mut file, &mut self.zip).map_err(|e| RecorderError::Archive {
            reason: format!("Failed to write entry {}: {}", entry_name, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(entry = entry_name, bytes, "Archive entry added");

        Ok(())
    }

    /// Finish and close the archive.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::Archive`] if the central directory
    /// cannot be written.
    #[track_caller]
    pub fn finish(self) -> CoreResult<()> {
        let path = self.path;
        self.zip.finish().map_err(|e| RecorderError::Archive {
            reason: format!("Failed to finalize {}: {}", path.display(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(path = %path.display(), "Archive finalized");

        Ok(())
    }
}
