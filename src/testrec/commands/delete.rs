use crate::commands::helpers::resolve_ids;
use crate::commands::{describe, CmdMessage, CmdResult};
use crate::error::{RecordError, Result};
use crate::store::{Database, StorageBackend};

/// Soft-delete: mark each record inactive, keeping it for recovery.
///
/// The batch is all or nothing: every id is checked first and the changes
/// go to disk in one commit.
pub fn run<B: StorageBackend>(db: &mut Database<B>, ids: &[u32]) -> Result<CmdResult> {
    let records = resolve_ids(db, ids)?;
    if let Some(record) = records.iter().find(|r| !r.active) {
        return Err(RecordError::AlreadyDeleted(record.id));
    }

    let mut result = CmdResult::default();
    let Some(first) = records.first().map(|r| r.id) else {
        return Ok(result);
    };

    let snapshot = db.snapshot();
    for mut record in records {
        let index = db.find_by_id(record.id)?;
        record.active = false;
        db.table_mut().replace_at(index, record.clone())?;
        result.affected_records.push(record);
    }
    db.commit_or_rollback(snapshot, first)?;

    for record in &result.affected_records {
        result.messages.push(CmdMessage::success(format!(
            "Record deleted: {}",
            describe(record)
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{list, RecordFilter};
    use crate::model::TestResult;
    use crate::store::fixtures::DatabaseFixture;

    #[test]
    fn marks_record_as_deleted() {
        let mut fx = DatabaseFixture::new().with_record("Alpha", "Smoke", TestResult::Passed);
        run(&mut fx.db, &[1]).unwrap();

        let deleted = list::run(&fx.db, RecordFilter::Deleted).unwrap();
        assert_eq!(deleted.listed_records.len(), 1);
        assert!(fx.file_text().ends_with("1,Alpha,Smoke,Passed,0\n"));
    }

    #[test]
    fn deleting_twice_is_an_error() {
        let mut fx = DatabaseFixture::new().with_deleted_record("Alpha", "Smoke");
        assert!(matches!(
            run(&mut fx.db, &[1]),
            Err(RecordError::AlreadyDeleted(1))
        ));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut fx = DatabaseFixture::new();
        assert!(matches!(run(&mut fx.db, &[5]), Err(RecordError::NotFound(5))));
    }

    #[test]
    fn failed_commit_keeps_record_active() {
        let mut fx = DatabaseFixture::new().with_record("Alpha", "Smoke", TestResult::Passed);
        let before = fx.file_text();
        fx.fail_writes();

        let err = run(&mut fx.db, &[1]).unwrap_err();
        assert!(matches!(err, RecordError::CommitFailed { id: 1, .. }));
        assert!(fx.db.table().records()[0].active);
        assert_eq!(fx.file_text(), before);
    }

    #[test]
    fn deletes_several_records() {
        let mut fx = DatabaseFixture::new()
            .with_record("Alpha", "Smoke", TestResult::Passed)
            .with_record("Bravo", "Smoke", TestResult::Passed)
            .with_record("Charlie", "Smoke", TestResult::Passed);

        let result = run(&mut fx.db, &[1, 3]).unwrap();
        assert_eq!(result.messages.len(), 2);
        assert_eq!(fx.db.table().active().count(), 1);
    }

    #[test]
    fn unknown_id_later_in_batch_changes_nothing() {
        let mut fx = DatabaseFixture::new()
            .with_record("Alpha", "Smoke", TestResult::Passed)
            .with_record("Bravo", "Load", TestResult::Failed);
        let before = fx.file_text();

        assert!(matches!(run(&mut fx.db, &[1, 99]), Err(RecordError::NotFound(99))));
        assert!(fx.db.table().records()[0].active);
        assert_eq!(fx.file_text(), before);
    }

    #[test]
    fn already_deleted_later_in_batch_changes_nothing() {
        let mut fx = DatabaseFixture::new()
            .with_record("Alpha", "Smoke", TestResult::Passed)
            .with_deleted_record("Bravo", "Load");
        let before = fx.file_text();

        assert!(matches!(
            run(&mut fx.db, &[1, 2]),
            Err(RecordError::AlreadyDeleted(2))
        ));
        assert_eq!(fx.file_text(), before);
    }

    #[test]
    fn failed_batch_commit_restores_every_record() {
        let mut fx = DatabaseFixture::new()
            .with_record("Alpha", "Smoke", TestResult::Passed)
            .with_record("Bravo", "Load", TestResult::Failed);
        fx.fail_writes();

        assert!(run(&mut fx.db, &[1, 2]).is_err());
        assert_eq!(fx.db.table().active().count(), 2);
    }

    #[test]
    fn repeated_id_is_deleted_once() {
        let mut fx = DatabaseFixture::new().with_record("Alpha", "Smoke", TestResult::Passed);
        let result = run(&mut fx.db, &[1, 1]).unwrap();
        assert_eq!(result.affected_records.len(), 1);
    }
}
