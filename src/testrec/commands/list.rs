use crate::commands::{CmdResult, RecordFilter};
use crate::error::Result;
use crate::store::{Database, StorageBackend};

pub fn run<B: StorageBackend>(db: &Database<B>, filter: RecordFilter) -> Result<CmdResult> {
    let table = db.table();
    let listed = match filter {
        RecordFilter::Active => table.active().cloned().collect(),
        RecordFilter::Deleted => table.deleted().cloned().collect(),
        RecordFilter::All => table.records().to_vec(),
    };
    Ok(CmdResult::default().with_listed_records(listed))
}
