use crate::error::{RecordError, Result};
use crate::model::{Record, DEFAULT_CAPACITY};
use std::collections::HashSet;

/// The in-memory record table.
///
/// Keeps records in insertion order and upholds, across every public method:
/// - ids are distinct and positive
/// - `next_id` is greater than every id in the table
/// - the table never holds more than `capacity` records
///
/// Soft-deleted records stay in the table; only [`RecordTable::remove_at`]
/// shrinks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTable {
    records: Vec<Record>,
    next_id: u32,
    capacity: usize,
}

impl Default for RecordTable {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecordTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            capacity,
        }
    }

    /// Builds a table from already decoded records, checking the invariants.
    pub fn from_records(records: Vec<Record>, capacity: usize) -> Result<Self> {
        if records.len() > capacity {
            return Err(RecordError::CapacityExceeded(capacity));
        }

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if record.id == 0 {
                return Err(RecordError::Store("record id 0 is not allowed".to_string()));
            }
            if !seen.insert(record.id) {
                return Err(RecordError::DuplicateId(record.id));
            }
        }

        let max_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        let next_id = max_id
            .checked_add(1)
            .ok_or_else(|| RecordError::Store("record id space exhausted".to_string()))?;

        Ok(Self {
            records,
            next_id,
            capacity,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn active(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.active)
    }

    pub fn deleted(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| !r.active)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Position of the record with `id`. Linear scan.
    pub fn find_by_id(&self, id: u32) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or(RecordError::NotFound(id))
    }

    pub fn get(&self, id: u32) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Hands out the next id. Ids are never handed out twice, even when the
    /// record that would have used one is never stored.
    pub fn next_id_and_advance(&mut self) -> Result<u32> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| RecordError::Store("record id space exhausted".to_string()))?;
        Ok(id)
    }

    /// Appends at the end. Leaves the table untouched on failure.
    pub fn append(&mut self, record: Record) -> Result<()> {
        if self.is_full() {
            return Err(RecordError::CapacityExceeded(self.capacity));
        }
        if record.id == 0 || self.get(record.id).is_some() {
            return Err(RecordError::DuplicateId(record.id));
        }
        if record.id >= self.next_id {
            self.next_id = record
                .id
                .checked_add(1)
                .ok_or_else(|| RecordError::Store("record id space exhausted".to_string()))?;
        }
        self.records.push(record);
        Ok(())
    }

    /// Overwrites the record at `index`; the id must not change.
    pub fn replace_at(&mut self, index: usize, record: Record) -> Result<()> {
        let slot = self
            .records
            .get_mut(index)
            .ok_or_else(|| RecordError::Store(format!("no record at position {}", index)))?;
        if slot.id != record.id {
            return Err(RecordError::Store(format!(
                "cannot change id {} to {}",
                slot.id, record.id
            )));
        }
        *slot = record;
        Ok(())
    }

    /// Removes the record at `index`, shifting later records down.
    pub fn remove_at(&mut self, index: usize) -> Result<Record> {
        if index >= self.records.len() {
            return Err(RecordError::Store(format!("no record at position {}", index)));
        }
        Ok(self.records.remove(index))
    }

    /// Puts back the records of an earlier snapshot. The id counter keeps its
    /// current value so ids handed out since the snapshot stay retired.
    pub fn restore(&mut self, snapshot: RecordTable) {
        self.next_id = self.next_id.max(snapshot.next_id);
        self.records = snapshot.records;
        self.capacity = snapshot.capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestResult;

    fn record(id: u32, name: &str) -> Record {
        Record::new(id, name.to_string(), "Smoke".to_string(), TestResult::Pending)
    }

    #[test]
    fn empty_table_starts_ids_at_one() {
        let mut table = RecordTable::new(10);
        assert_eq!(table.next_id_and_advance().unwrap(), 1);
        assert_eq!(table.next_id_and_advance().unwrap(), 2);
        assert_eq!(table.next_id(), 3);
    }

    #[test]
    fn from_records_sets_next_id_past_max() {
        let table =
            RecordTable::from_records(vec![record(4, "a"), record(17, "b"), record(2, "c")], 10)
                .unwrap();
        assert_eq!(table.next_id(), 18);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn from_records_rejects_duplicates_and_overflow() {
        assert!(matches!(
            RecordTable::from_records(vec![record(1, "a"), record(1, "b")], 10),
            Err(RecordError::DuplicateId(1))
        ));
        assert!(matches!(
            RecordTable::from_records(vec![record(1, "a"), record(2, "b")], 1),
            Err(RecordError::CapacityExceeded(1))
        ));
    }

    #[test]
    fn append_fails_when_full_without_mutating() {
        let mut table = RecordTable::new(1);
        table.append(record(1, "a")).unwrap();
        let before = table.clone();

        let err = table.append(record(2, "b")).unwrap_err();
        assert!(matches!(err, RecordError::CapacityExceeded(1)));
        assert_eq!(table, before);
    }

    #[test]
    fn append_rejects_duplicate_id() {
        let mut table = RecordTable::new(5);
        table.append(record(1, "a")).unwrap();
        assert!(matches!(
            table.append(record(1, "b")),
            Err(RecordError::DuplicateId(1))
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn append_keeps_next_id_ahead() {
        let mut table = RecordTable::new(5);
        table.append(record(9, "a")).unwrap();
        assert_eq!(table.next_id(), 10);
    }

    #[test]
    fn find_by_id_reports_missing() {
        let table = RecordTable::from_records(vec![record(3, "a")], 5).unwrap();
        assert_eq!(table.find_by_id(3).unwrap(), 0);
        assert!(matches!(table.find_by_id(4), Err(RecordError::NotFound(4))));
    }

    #[test]
    fn replace_at_refuses_id_change() {
        let mut table = RecordTable::from_records(vec![record(3, "a")], 5).unwrap();
        assert!(table.replace_at(0, record(4, "b")).is_err());
        table.replace_at(0, record(3, "renamed")).unwrap();
        assert_eq!(table.records()[0].system_name, "renamed");
    }

    #[test]
    fn remove_at_compacts_preserving_order() {
        let mut table = RecordTable::from_records(
            vec![record(1, "a"), record(2, "b"), record(3, "c"), record(4, "d")],
            10,
        )
        .unwrap();
        let removed = table.remove_at(1).unwrap();
        assert_eq!(removed.id, 2);
        let ids: Vec<u32> = table.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        // Removing the highest id never lowers the counter.
        table.remove_at(2).unwrap();
        assert_eq!(table.next_id(), 5);
    }

    #[test]
    fn restore_keeps_ids_retired() {
        let mut table = RecordTable::new(5);
        let snapshot = table.clone();
        let id = table.next_id_and_advance().unwrap();
        table.append(record(id, "a")).unwrap();

        table.restore(snapshot);
        assert!(table.is_empty());
        assert_eq!(table.next_id(), 2);
    }
}
