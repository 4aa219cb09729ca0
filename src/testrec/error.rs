use crate::codec::FormatError;
use crate::validation::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Cannot access {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid database file {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Record not found: {0}")]
    NotFound(u32),

    #[error("Record {0} is already deleted")]
    AlreadyDeleted(u32),

    #[error("Record {0} is not deleted (soft-delete it first)")]
    NotDeleted(u32),

    #[error("Database is full ({0} records)")]
    CapacityExceeded(usize),

    #[error("Duplicate record id: {0}")]
    DuplicateId(u32),

    #[error("Could not save record {id}, changes were rolled back: {source}")]
    CommitFailed {
        id: u32,
        #[source]
        source: Box<RecordError>,
    },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecordError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecordError::File {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
