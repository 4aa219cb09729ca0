use super::backend::StorageBackend;
use crate::error::{RecordError, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBackend;

impl FsBackend {
    pub fn new() -> Self {
        Self
    }

    fn parent_dir(path: &Path) -> &Path {
        match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RecordError::file(path, e)),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let dir = Self::parent_dir(path);
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("records");

        // Atomic write: the temp file lives next to the target so rename
        // never crosses filesystems.
        let tmp_path = dir.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(|e| RecordError::file(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(RecordError::file(path, e));
        }
        Ok(())
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => RecordError::AlreadyExists(path.to_path_buf()),
                _ => RecordError::file(path, e),
            })?;
        file.write_all(content.as_bytes())
            .map_err(|e| RecordError::file(path, e))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| RecordError::file(dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RecordError::file(dir, e))?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }
}
