//! Local save file for "continue last game".
//!
//! [`SnapshotStore`] writes each snapshot to a sibling `.tmp` file, syncs
//! it, and renames it over the save file. A crash or stop mid-write leaves
//! either the previous save or the new one, never a truncated file.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::{self, CodecError};
use crate::snapshot::Snapshot;

/// Errors from reading or writing the save file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The filesystem operation failed.
    #[error("snapshot I/O error on {path}: {source}")]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file exists but does not hold a snapshot.
    #[error("snapshot codec error: {source}")]
    Codec {
        /// The underlying codec error.
        #[from]
        source: CodecError,
    },
}

/// The on-disk save file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store backed by `path`. Nothing is touched until the first
    /// save or load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the save file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replace the save file with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the temporary file cannot be written
    /// or renamed, and [`StoreError::Codec`] if encoding fails.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let text = codec::encode(snapshot)?;
        let tmp = self.temp_path();

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(text.as_bytes())?;
            file.sync_all()
        };
        write().map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;

        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), bytes = text.len(), "snapshot saved");
        Ok(())
    }

    /// Read the save file.
    ///
    /// Returns `Ok(None)` when there is no save yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, and
    /// [`StoreError::Codec`] if it does not decode.
    pub fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        Ok(Some(codec::decode(&text)?))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}
