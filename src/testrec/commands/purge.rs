use crate::commands::helpers::resolve_ids;
use crate::commands::{describe, CmdMessage, CmdResult};
use crate::error::{RecordError, Result};
use crate::store::{Database, StorageBackend};

/// Permanently remove soft-deleted records.
///
/// With no ids, every soft-deleted record is purged. A record that is still
/// active is refused: it has to be soft-deleted first.
pub fn run<B: StorageBackend>(db: &mut Database<B>, ids: &[u32]) -> Result<CmdResult> {
    let targets: Vec<u32> = if ids.is_empty() {
        db.table().deleted().map(|r| r.id).collect()
    } else {
        ids.to_vec()
    };

    let mut result = CmdResult::default();
    if targets.is_empty() {
        result.add_message(CmdMessage::info("No records to purge."));
        return Ok(result);
    }

    let records = resolve_ids(db, &targets)?;
    if let Some(record) = records.iter().find(|r| r.active) {
        return Err(RecordError::NotDeleted(record.id));
    }

    // One snapshot for the whole batch; a failed commit puts every row back
    // in its original position.
    let snapshot = db.snapshot();
    for record in &records {
        let index = db.find_by_id(record.id)?;
        let removed = db.table_mut().remove_at(index)?;
        result.affected_records.push(removed);
    }
    db.commit_or_rollback(snapshot, targets[0])?;

    for record in &result.affected_records {
        result.messages.push(CmdMessage::success(format!(
            "Purged: {}",
            describe(record)
        )));
    }
    Ok(result)
}
