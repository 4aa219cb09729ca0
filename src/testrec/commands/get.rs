use crate::commands::CmdResult;
use crate::error::{RecordError, Result};
use crate::store::{Database, StorageBackend};

/// Look up one record by id, whether active or deleted.
pub fn run<B: StorageBackend>(db: &Database<B>, id: u32) -> Result<CmdResult> {
    let record = db.table().get(id).cloned().ok_or(RecordError::NotFound(id))?;
    Ok(CmdResult::default().with_listed_records(vec![record]))
}
