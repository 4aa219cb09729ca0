use crate::config::RecordConfig;
use crate::model::{Record, TestResult};
use crate::store::{Database, StorageBackend};
use std::path::PathBuf;

pub mod add;
pub mod config;
pub mod delete;
pub mod files;
pub mod get;
pub mod helpers;
pub mod list;
pub mod purge;
pub mod recover;
pub mod search;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A candidate database file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseFile {
    pub path: PathBuf,
    /// Whether the file starts with the expected header.
    pub valid_header: bool,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<Record>,
    pub listed_records: Vec<Record>,
    pub database_files: Vec<DatabaseFile>,
    pub config: Option<RecordConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<Record>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<Record>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_database_files(mut self, files: Vec<DatabaseFile>) -> Self {
        self.database_files = files;
        self
    }

    pub fn with_config(mut self, config: RecordConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Field values for a record about to be added. Names are validated by `add`.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub system_name: String,
    pub test_type: String,
    pub result: TestResult,
}

impl NewRecord {
    pub fn new(system_name: impl Into<String>, test_type: impl Into<String>, result: TestResult) -> Self {
        Self {
            system_name: system_name.into(),
            test_type: test_type.into(),
            result,
        }
    }
}

/// One change inside an edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    SystemName(String),
    TestType(String),
    Result(TestResult),
}

/// Which records a listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordFilter {
    #[default]
    Active,
    Deleted,
    All,
}

/// Turn the warnings from the last load into messages.
pub fn load_messages<B: StorageBackend>(db: &Database<B>) -> CmdResult {
    let mut result = CmdResult::default();
    for warning in db.load_warnings() {
        result.add_message(CmdMessage::warning(warning.to_string()));
    }
    result
}

pub(crate) fn describe(record: &Record) -> String {
    format!("#{} {} ({})", record.id, record.system_name, record.test_type)
}
