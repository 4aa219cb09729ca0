use crate::commands::helpers::resolve_ids;
use crate::commands::{describe, CmdMessage, CmdResult};
use crate::error::{RecordError, Result};
use crate::store::{Database, StorageBackend};

/// Bring soft-deleted records back, all of them or none.
pub fn run<B: StorageBackend>(db: &mut Database<B>, ids: &[u32]) -> Result<CmdResult> {
    let records = resolve_ids(db, ids)?;
    if let Some(record) = records.iter().find(|r| r.active) {
        return Err(RecordError::NotDeleted(record.id));
    }

    let mut result = CmdResult::default();
    let Some(first) = records.first().map(|r| r.id) else {
        return Ok(result);
    };

    let snapshot = db.snapshot();
    for mut record in records {
        let index = db.find_by_id(record.id)?;
        record.active = true;
        db.table_mut().replace_at(index, record.clone())?;
        result.affected_records.push(record);
    }
    db.commit_or_rollback(snapshot, first)?;

    for record in &result.affected_records {
        result.messages.push(CmdMessage::success(format!(
            "Record recovered: {}",
            describe(record)
        )));
    }
    Ok(result)
}
