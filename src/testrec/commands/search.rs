use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::{Database, StorageBackend};
use crate::validation::validate_query;

/// Case-insensitive substring search over active records, in table order.
pub fn run<B: StorageBackend>(db: &Database<B>, query: &str) -> Result<CmdResult> {
    let needle = validate_query(query)?.to_lowercase();
    let matches = db
        .table()
        .active()
        .filter(|r| r.matches(&needle))
        .cloned()
        .collect();
    Ok(CmdResult::default().with_listed_records(matches))
}
