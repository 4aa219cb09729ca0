//! # Edit Sessions
//!
//! Updating a record is a small state machine rather than a single call:
//!
//! ```text
//!            apply(edit)
//!             ┌──────┐
//!             ▼      │
//! begin ──► Editing ─┘
//!             │
//!             ├── save()   ──► Saved      (commit; on failure restore backup)
//!             └── cancel() ──► Cancelled  (restore backup, no commit)
//! ```
//!
//! Every accepted edit is applied to the record in the table straight away,
//! while the session keeps an untouched copy of the original. Both terminal
//! transitions consume the session. A session dropped while still editing is
//! treated as cancelled, so the table never keeps a half-finished edit.

use crate::commands::{describe, CmdMessage, CmdResult, FieldEdit};
use crate::error::{RecordError, Result};
use crate::model::Record;
use crate::store::{Database, StorageBackend};
use crate::validation::{validate_system_name, validate_test_type};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Editing,
    Saved,
    Cancelled,
}

pub struct EditSession<'a, B: StorageBackend> {
    db: &'a mut Database<B>,
    index: usize,
    backup: Record,
    state: EditState,
}

impl<'a, B: StorageBackend> EditSession<'a, B> {
    /// Start editing an active record.
    pub fn begin(db: &'a mut Database<B>, id: u32) -> Result<Self> {
        let index = db.find_by_id(id)?;
        let backup = db.table().records()[index].clone();
        if !backup.active {
            return Err(RecordError::NotFound(id));
        }
        Ok(Self {
            db,
            index,
            backup,
            state: EditState::Editing,
        })
    }

    pub fn id(&self) -> u32 {
        self.backup.id
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// The record as it was when the session began.
    pub fn original(&self) -> &Record {
        &self.backup
    }

    /// The record with all edits so far.
    pub fn current(&self) -> &Record {
        &self.db.table().records()[self.index]
    }

    pub fn is_modified(&self) -> bool {
        self.current() != &self.backup
    }

    /// Validate and apply one edit. A rejected edit changes nothing.
    pub fn apply(&mut self, edit: FieldEdit) -> Result<()> {
        let mut record = self.current().clone();
        match edit {
            FieldEdit::SystemName(name) => record.system_name = validate_system_name(&name)?,
            FieldEdit::TestType(test_type) => record.test_type = validate_test_type(&test_type)?,
            FieldEdit::Result(result) => record.result = result,
        }
        self.db.table_mut().replace_at(self.index, record)
    }

    /// Commit the edits. If the write fails the original record is put back.
    pub fn save(mut self) -> Result<Record> {
        if !self.is_modified() {
            self.state = EditState::Saved;
            return Ok(self.backup.clone());
        }

        if let Err(e) = self.db.commit() {
            warn!(id = self.id(), error = %e, "saving edits failed, restoring original");
            self.restore();
            self.state = EditState::Cancelled;
            return Err(RecordError::CommitFailed {
                id: self.id(),
                source: Box::new(e),
            });
        }

        self.state = EditState::Saved;
        Ok(self.current().clone())
    }

    /// Throw the edits away without touching the file.
    pub fn cancel(mut self) -> Record {
        self.restore();
        self.state = EditState::Cancelled;
        self.backup.clone()
    }

    fn restore(&mut self) {
        let backup = self.backup.clone();
        if let Err(e) = self.db.table_mut().replace_at(self.index, backup) {
            warn!(id = self.backup.id, error = %e, "could not restore record");
        }
    }
}

impl<B: StorageBackend> Drop for EditSession<'_, B> {
    fn drop(&mut self) {
        if self.state == EditState::Editing {
            self.restore();
            self.state = EditState::Cancelled;
        }
    }
}

/// Apply a batch of edits to one record and save them in a single commit.
pub fn run<B: StorageBackend>(db: &mut Database<B>, id: u32, edits: &[FieldEdit]) -> Result<CmdResult> {
    let mut session = EditSession::begin(db, id)?;
    for edit in edits {
        session.apply(edit.clone())?;
    }

    let mut result = CmdResult::default();
    if !session.is_modified() {
        session.cancel();
        result.add_message(CmdMessage::info(format!("Record {} unchanged", id)));
        return Ok(result);
    }

    let record = session.save()?;
    result.add_message(CmdMessage::success(format!(
        "Record updated: {}",
        describe(&record)
    )));
    Ok(result.with_affected_records(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestResult;
    use crate::store::fixtures::DatabaseFixture;

    fn fixture() -> DatabaseFixture {
        DatabaseFixture::new()
            .with_record("Alpha", "Smoke", TestResult::Pending)
            .with_deleted_record("Bravo", "Load")
    }

    #[test]
    fn applies_several_edits_before_save() {
        let mut fx = fixture();
        let mut session = EditSession::begin(&mut fx.db, 1).unwrap();
        session.apply(FieldEdit::SystemName("Alpha Prime".into())).unwrap();
        session.apply(FieldEdit::TestType("Regression".into())).unwrap();
        session.apply(FieldEdit::Result(TestResult::Passed)).unwrap();
        assert_eq!(session.original().system_name, "Alpha");
        assert_eq!(session.current().system_name, "Alpha Prime");

        let saved = session.save().unwrap();
        assert_eq!(saved.test_type, "Regression");
        assert!(fx.file_text().contains("1,Alpha Prime,Regression,Passed,1"));
    }

    #[test]
    fn rejected_edit_leaves_session_editing() {
        let mut fx = fixture();
        let mut session = EditSession::begin(&mut fx.db, 1).unwrap();
        assert!(session.apply(FieldEdit::SystemName("AB".into())).is_err());
        assert_eq!(session.state(), EditState::Editing);
        assert!(!session.is_modified());

        session.apply(FieldEdit::SystemName("ABC".into())).unwrap();
        assert!(session.is_modified());
    }

    #[test]
    fn cancel_restores_original_without_commit() {
        let mut fx = fixture();
        let before = fx.file_text();
        fx.fail_writes();

        let mut session = EditSession::begin(&mut fx.db, 1).unwrap();
        session.apply(FieldEdit::SystemName("Changed".into())).unwrap();
        let original = session.cancel();

        assert_eq!(original.system_name, "Alpha");
        assert_eq!(fx.db.table().records()[0].system_name, "Alpha");
        assert_eq!(fx.file_text(), before);
    }

    #[test]
    fn dropping_an_open_session_cancels_it() {
        let mut fx = fixture();
        {
            let mut session = EditSession::begin(&mut fx.db, 1).unwrap();
            session.apply(FieldEdit::TestType("Changed".into())).unwrap();
        }
        assert_eq!(fx.db.table().records()[0].test_type, "Smoke");
    }

    #[test]
    fn failed_save_restores_backup() {
        let mut fx = fixture();
        let before = fx.file_text();
        fx.fail_writes();

        let mut session = EditSession::begin(&mut fx.db, 1).unwrap();
        session.apply(FieldEdit::Result(TestResult::Failed)).unwrap();
        let err = session.save().unwrap_err();

        assert!(matches!(err, RecordError::CommitFailed { id: 1, .. }));
        assert_eq!(fx.db.table().records()[0].result, TestResult::Pending);
        assert_eq!(fx.file_text(), before);
    }

    #[test]
    fn cannot_edit_missing_or_deleted_records() {
        let mut fx = fixture();
        assert!(matches!(
            EditSession::begin(&mut fx.db, 2).err().unwrap(),
            RecordError::NotFound(2)
        ));
        assert!(matches!(
            EditSession::begin(&mut fx.db, 99).err().unwrap(),
            RecordError::NotFound(99)
        ));
    }

    #[test]
    fn run_applies_batch() {
        let mut fx = fixture();
        let result = run(
            &mut fx.db,
            1,
            &[
                FieldEdit::SystemName("Gamma".into()),
                FieldEdit::Result(TestResult::Success),
            ],
        )
        .unwrap();
        assert_eq!(result.affected_records[0].system_name, "Gamma");
        assert_eq!(result.affected_records[0].result, TestResult::Success);
    }

    #[test]
    fn run_with_bad_edit_changes_nothing() {
        let mut fx = fixture();
        let before = fx.file_text();
        let err = run(
            &mut fx.db,
            1,
            &[
                FieldEdit::SystemName("Gamma".into()),
                FieldEdit::TestType("not valid".into()),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::Validation(_)));
        assert_eq!(fx.db.table().records()[0].system_name, "Alpha");
        assert_eq!(fx.file_text(), before);
    }

    #[test]
    fn run_without_changes_reports_unchanged() {
        let mut fx = fixture();
        let result = run(&mut fx.db, 1, &[FieldEdit::Result(TestResult::Pending)]).unwrap();
        assert!(result.affected_records.is_empty());
        assert!(result.messages[0].content.contains("unchanged"));
    }
}
