use crate::error::Result;
use crate::model::Record;
use crate::store::{Database, StorageBackend};

/// Look up every id before anything is mutated, so a bad id fails the whole
/// batch. Repeated ids are resolved once, keeping the first position.
pub fn resolve_ids<B: StorageBackend>(db: &Database<B>, ids: &[u32]) -> Result<Vec<Record>> {
    let mut resolved: Vec<Record> = Vec::with_capacity(ids.len());
    for &id in ids {
        if resolved.iter().any(|r| r.id == id) {
            continue;
        }
        let index = db.find_by_id(id)?;
        resolved.push(db.table().records()[index].clone());
    }
    Ok(resolved)
}
