use super::backend::StorageBackend;
use super::table::RecordTable;
use crate::codec::{self, DecodeWarning};
use crate::error::{RecordError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A record table bound to its backing file.
///
/// The file is only ever written by [`Database::commit`], which rewrites it
/// whole. Mutating operations follow one pattern:
///
/// ```text
/// snapshot -> mutate table -> commit_or_rollback(snapshot)
/// ```
///
/// so a failed write always puts the table back to what is on disk.
pub struct Database<B: StorageBackend> {
    backend: B,
    path: PathBuf,
    table: RecordTable,
    warnings: Vec<DecodeWarning>,
}

impl<B: StorageBackend> Database<B> {
    /// Load an existing database file.
    pub fn open(backend: B, path: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        let path = path.into();
        let (table, warnings) = load(&backend, &path, capacity)?;
        Ok(Self {
            backend,
            path,
            table,
            warnings,
        })
    }

    /// Create a new database file holding only the header.
    /// Never overwrites an existing file.
    pub fn create(backend: B, path: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        let path = path.into();
        backend.create_new(&path, &codec::encode(&[]))?;
        info!(path = %path.display(), "created database");
        Ok(Self {
            backend,
            path,
            table: RecordTable::new(capacity),
            warnings: Vec::new(),
        })
    }

    /// Rebind to another existing file. On failure the current binding is kept.
    pub fn switch_to(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let (table, warnings) = load(&self.backend, &path, self.table.capacity())?;
        self.path = path;
        self.table = table;
        self.warnings = warnings;
        Ok(())
    }

    /// Create a new file and rebind to it. On failure the current binding is kept.
    pub fn switch_to_new(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.backend.create_new(&path, &codec::encode(&[]))?;
        info!(path = %path.display(), "created database");
        self.table = RecordTable::new(self.table.capacity());
        self.path = path;
        self.warnings.clear();
        Ok(())
    }

    /// Write the whole table to the backing file.
    pub fn commit(&self) -> Result<()> {
        let text = codec::encode(self.table.records());
        self.backend.write(&self.path, &text)?;
        debug!(path = %self.path.display(), records = self.table.len(), "committed");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Warnings produced when the current file was loaded.
    pub fn load_warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    pub fn find_by_id(&self, id: u32) -> Result<usize> {
        self.table.find_by_id(id)
    }

    pub(crate) fn table_mut(&mut self) -> &mut RecordTable {
        &mut self.table
    }

    pub(crate) fn snapshot(&self) -> RecordTable {
        self.table.clone()
    }

    pub(crate) fn rollback(&mut self, snapshot: RecordTable) {
        self.table.restore(snapshot);
    }

    /// Commit, or restore `snapshot` and report which record could not be saved.
    pub(crate) fn commit_or_rollback(&mut self, snapshot: RecordTable, id: u32) -> Result<()> {
        if let Err(e) = self.commit() {
            warn!(path = %self.path.display(), id, error = %e, "commit failed, rolling back");
            self.rollback(snapshot);
            return Err(RecordError::CommitFailed {
                id,
                source: Box::new(e),
            });
        }
        Ok(())
    }
}

fn load<B: StorageBackend>(
    backend: &B,
    path: &Path,
    capacity: usize,
) -> Result<(RecordTable, Vec<DecodeWarning>)> {
    let text = backend
        .read(path)?
        .ok_or_else(|| RecordError::FileNotFound(path.to_path_buf()))?;

    let decoded = codec::decode(&text).map_err(|source| RecordError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    for warning in &decoded.warnings {
        warn!(path = %path.display(), "{}", warning);
    }
    if decoded.skipped > 0 {
        debug!(path = %path.display(), skipped = decoded.skipped, "skipped unreadable rows");
    }

    let table = RecordTable::from_records(decoded.records, capacity)?;
    info!(path = %path.display(), records = table.len(), "opened database");
    Ok((table, decoded.warnings))
}
