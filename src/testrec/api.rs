//! # API Facade
//!
//! The single entry point for every record operation, whatever the UI.
//!
//! The facade:
//! - **Dispatches** to the command modules
//! - **Normalizes inputs** (user-typed id strings become validated ids)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It holds no business logic and does no I/O of its own beyond what the
//! bound [`Database`] does.
//!
//! `RecordApi<B: StorageBackend>` is generic over the backend:
//! `RecordApi<FsBackend>` in production, `RecordApi<MemBackend>` in tests.

use crate::commands::{self, update::EditSession};
use crate::error::Result;
use crate::store::{Database, StorageBackend};
use crate::validation::validate_record_id;
use std::path::{Path, PathBuf};

pub struct RecordApi<B: StorageBackend> {
    db: Database<B>,
    config_dir: PathBuf,
}

impl<B: StorageBackend> RecordApi<B> {
    pub fn new(db: Database<B>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            config_dir: config_dir.into(),
        }
    }

    pub fn database(&self) -> &Database<B> {
        &self.db
    }

    /// Warnings from loading the currently bound file.
    pub fn load_messages(&self) -> CmdResult {
        commands::load_messages(&self.db)
    }

    pub fn add_record(&mut self, new: NewRecord) -> Result<CmdResult> {
        commands::add::run(&mut self.db, new)
    }

    pub fn update_record(&mut self, id: &str, edits: &[FieldEdit]) -> Result<CmdResult> {
        let id = validate_record_id(id)?;
        commands::update::run(&mut self.db, id, edits)
    }

    /// Start an interactive edit session on one record.
    pub fn edit_record(&mut self, id: &str) -> Result<EditSession<'_, B>> {
        let id = validate_record_id(id)?;
        EditSession::begin(&mut self.db, id)
    }

    pub fn delete_records<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<CmdResult> {
        let ids = parse_ids(ids)?;
        commands::delete::run(&mut self.db, &ids)
    }

    pub fn purge_records<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<CmdResult> {
        let ids = parse_ids(ids)?;
        commands::purge::run(&mut self.db, &ids)
    }

    pub fn recover_records<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<CmdResult> {
        let ids = parse_ids(ids)?;
        commands::recover::run(&mut self.db, &ids)
    }

    pub fn search_records(&self, query: &str) -> Result<CmdResult> {
        commands::search::run(&self.db, query)
    }

    pub fn list_records(&self, filter: RecordFilter) -> Result<CmdResult> {
        commands::list::run(&self.db, filter)
    }

    pub fn get_record(&self, id: &str) -> Result<CmdResult> {
        let id = validate_record_id(id)?;
        commands::get::run(&self.db, id)
    }

    pub fn find_by_id(&self, id: u32) -> Result<usize> {
        self.db.find_by_id(id)
    }

    pub fn commit(&self) -> Result<()> {
        self.db.commit()
    }

    /// Rebind to another existing database file.
    pub fn change_database(&mut self, path: impl Into<PathBuf>) -> Result<CmdResult> {
        self.db.switch_to(path)?;
        let mut result = self.load_messages();
        result.add_message(CmdMessage::success(format!(
            "Using database {} ({} records)",
            self.db.path().display(),
            self.db.table().len()
        )));
        Ok(result)
    }

    /// Create a new database file and rebind to it.
    pub fn create_database(&mut self, path: impl Into<PathBuf>) -> Result<CmdResult> {
        self.db.switch_to_new(path)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Created database {}",
            self.db.path().display()
        )));
        Ok(result)
    }

    pub fn database_files(&self, dir: &Path) -> Result<CmdResult> {
        commands::files::run(self.db.backend(), dir)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

fn parse_ids<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<u32>> {
    inputs
        .iter()
        .map(|s| validate_record_id(s.as_ref()).map_err(Into::into))
        .collect()
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::update::EditState;
pub use commands::{
    CmdMessage, CmdResult, DatabaseFile, FieldEdit, MessageLevel, NewRecord, RecordFilter,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::HEADER;
    use crate::error::RecordError;
    use crate::model::TestResult;
    use crate::store::fixtures::DatabaseFixture;
    use crate::store::MemBackend;

    fn api() -> RecordApi<MemBackend> {
        let fx = DatabaseFixture::new()
            .with_record("Alpha", "Smoke", TestResult::Passed)
            .with_record("Bravo", "Load", TestResult::Failed);
        RecordApi::new(fx.db, "unused-config-dir")
    }

    #[test]
    fn string_ids_are_validated_before_dispatch() {
        let mut api = api();
        let err = api.delete_records(&["1", "x2"]).unwrap_err();
        assert!(matches!(err, RecordError::Validation(_)));
        // Nothing was deleted because parsing happens first.
        assert_eq!(api.database().table().active().count(), 2);
    }

    #[test]
    fn dispatches_soft_delete_purge_and_recover() {
        let mut api = api();
        api.delete_records(&["1", "2"]).unwrap();
        api.recover_records(&["2"]).unwrap();
        api.purge_records(&["1"]).unwrap();

        let listed = api.list_records(RecordFilter::All).unwrap().listed_records;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 2);
        assert!(listed[0].active);
    }

    #[test]
    fn edit_session_through_api() {
        let mut api = api();
        {
            let mut session = api.edit_record("2").unwrap();
            session.apply(FieldEdit::Result(TestResult::Passed)).unwrap();
            session.save().unwrap();
        }
        let shown = api.get_record("2").unwrap();
        assert_eq!(shown.listed_records[0].result, TestResult::Passed);
    }

    #[test]
    fn change_database_rebinds() {
        let backend = MemBackend::new()
            .with_file("a.csv", format!("{}\n1,Alpha,Smoke,Passed,1\n", HEADER))
            .with_file("b.csv", format!("{}\n5,Echo,Unit,Pending,1\n9,Nine,Unit,Bogus,1\n", HEADER));
        let db = Database::open(backend, "a.csv", 10).unwrap();
        let mut api = RecordApi::new(db, "cfg");

        let result = api.change_database("b.csv").unwrap();
        assert_eq!(api.database().path(), Path::new("b.csv"));
        // One warning for the bogus result, one success line.
        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.messages[0].level, MessageLevel::Warning);

        let added = api
            .add_record(NewRecord::new("Foxtrot", "Unit", TestResult::Pending))
            .unwrap();
        assert_eq!(added.affected_records[0].id, 10);
    }

    #[test]
    fn create_database_refuses_existing_path() {
        let mut api = api();
        assert!(matches!(
            api.create_database("records.csv"),
            Err(RecordError::AlreadyExists(_))
        ));
        api.create_database("fresh.csv").unwrap();
        assert!(api.database().table().is_empty());
    }
}
