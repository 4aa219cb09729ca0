use crate::error::Result;
use std::path::{Path, PathBuf};

/// Abstract interface for raw file I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while `Database` handles the "what" (decoding, commits, rollback).
pub trait StorageBackend {
    /// Read a whole file.
    /// Returns Ok(None) if the file does not exist.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read(&self, path: &Path) -> Result<Option<String>>;

    /// Replace the contents of a file, creating it if needed.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Create a file that must not exist yet.
    /// Returns `RecordError::AlreadyExists` if it does.
    fn create_new(&self, path: &Path, content: &str) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Regular files directly inside `dir`, in no particular order.
    fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}
