//! Durable backing for the persisted session.
//!
//! Storage deals in raw JSON text; decoding and invariant checks belong to
//! the session store so every backend gets the same corrupt-state handling.

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Errors raised by a session storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the serialized session lives between runs.
pub trait SessionStorage: Send + Sync {
    /// Read the stored document, `None` if nothing has been stored.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored document.
    fn save(&self, raw: &str) -> Result<(), StorageError>;

    /// Remove the stored document. Removing nothing is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// FILE
// =============================================================================

/// Session file on local disk, written via temp file + rename.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, raw: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw).map_err(|e| self.io_error(e))?;
        restrict_permissions(&tmp).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// The file holds a bearer token: owner read/write only.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local storage for tests and runs without a config directory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    raw: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Storage pre-seeded with a document, as if written by an earlier run.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { raw: Mutex::new(Some(raw.into())) }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.raw.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone())
    }

    fn save(&self, raw: &str) -> Result<(), StorageError> {
        *self.raw.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(raw.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.raw.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        Ok(())
    }
}
