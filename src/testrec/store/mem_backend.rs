use super::backend::StorageBackend;
use crate::error::{RecordError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the record manager is
/// single-threaded, so the `StorageBackend` trait can use `&self` throughout.
#[derive(Default)]
pub struct MemBackend {
    files: RefCell<BTreeMap<PathBuf, String>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file directly, bypassing the write error simulation.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), content.into());
        self
    }

    /// Make every subsequent write fail, for testing rollback paths.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    fn check_write(&self, path: &Path) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(RecordError::file(
                path,
                io::Error::new(io::ErrorKind::Other, "simulated write error"),
            ));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.files.borrow().get(path).cloned())
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.check_write(path)?;
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        if self.exists(path) {
            return Err(RecordError::AlreadyExists(path.to_path_buf()));
        }
        self.write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let dir = current_dir_as_empty(dir);
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|p| p.parent().map(current_dir_as_empty) == Some(dir))
            .cloned()
            .collect())
    }
}

/// `a.csv` has an empty parent, so `.` is treated as that empty path.
fn current_dir_as_empty(dir: &Path) -> &Path {
    if dir == Path::new(".") {
        Path::new("")
    } else {
        dir
    }
}
