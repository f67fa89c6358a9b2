//! The write-ahead log file handle.
//!
//! Record formats and recovery are handled by the recovery subsystem. This
//! module owns opening the single log file of a database; every other
//! component relies on that having succeeded.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

/// Default log file name, relative to the working directory.
pub const LOG_FILE_NAME: &str = "log";

/// Result type for log file operations.
pub type LogResult<T> = Result<T, LogError>;

/// Log file errors.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log file could not be opened or created.
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Handle to the database's write-ahead log file.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: Mutex<File>,
}

impl LogFile {
    /// Open the log file at `path`, creating it if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> LogResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "opened log file");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path the log was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current length of the log in bytes.
    pub fn len(&self) -> LogResult<u64> {
        Ok(self.file.lock().metadata()?.len())
    }

    /// Check if nothing has been written to the log yet.
    pub fn is_empty(&self) -> LogResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Flush the log to stable storage.
    pub fn sync(&self) -> LogResult<()> {
        self.file.lock().sync_all()?;
        Ok(())
    }
}
