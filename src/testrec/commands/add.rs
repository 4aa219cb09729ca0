use crate::commands::{describe, CmdMessage, CmdResult, NewRecord};
use crate::error::{RecordError, Result};
use crate::model::Record;
use crate::store::{Database, StorageBackend};
use crate::validation::{validate_system_name, validate_test_type};

pub fn run<B: StorageBackend>(db: &mut Database<B>, new: NewRecord) -> Result<CmdResult> {
    let system_name = validate_system_name(&new.system_name)?;
    let test_type = validate_test_type(&new.test_type)?;

    if db.table().is_full() {
        return Err(RecordError::CapacityExceeded(db.table().capacity()));
    }

    let snapshot = db.snapshot();
    let id = db.table_mut().next_id_and_advance()?;
    let record = Record::new(id, system_name, test_type, new.result);
    db.table_mut().append(record.clone())?;
    db.commit_or_rollback(snapshot, id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Record added: {}", describe(&record))));
    Ok(result.with_affected_records(vec![record]))
}
