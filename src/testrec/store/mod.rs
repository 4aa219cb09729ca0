//! # Storage Layer
//!
//! Three pieces, leaf to root:
//!
//! - [`table::RecordTable`]: the in-memory table. Owns the records and the id
//!   counter and enforces the invariants (unique ids, ids never reused, capacity).
//! - [`backend::StorageBackend`]: raw file I/O behind a trait.
//!   - [`fs_backend::FsBackend`]: production, atomic temp-file + rename writes.
//!   - [`mem_backend::MemBackend`]: in-memory, with write-failure simulation.
//! - [`database::Database`]: binds a table to one backing file. Loads it at
//!   open time and rewrites it whole on every commit.
//!
//! ## Consistency
//!
//! Memory and disk must never disagree after an operation returns. Every
//! mutation takes a full snapshot of the table first; if the commit fails the
//! snapshot is restored. The id counter is the one thing a rollback does not
//! rewind, so an id that was handed out is never handed out again.

pub mod backend;
pub mod database;
pub mod fs_backend;
pub mod mem_backend;
pub mod table;

pub use backend::StorageBackend;
pub use database::Database;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
pub use table::RecordTable;

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Record, TestResult, DEFAULT_CAPACITY};
    use std::path::Path;

    pub const FIXTURE_PATH: &str = "records.csv";

    pub struct DatabaseFixture {
        pub db: Database<MemBackend>,
    }

    impl Default for DatabaseFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DatabaseFixture {
        pub fn new() -> Self {
            Self::with_capacity(DEFAULT_CAPACITY)
        }

        pub fn with_capacity(capacity: usize) -> Self {
            Self {
                db: Database::create(MemBackend::new(), FIXTURE_PATH, capacity).unwrap(),
            }
        }

        /// Open a database whose file holds exactly `text`.
        pub fn from_text(text: &str) -> Self {
            let backend = MemBackend::new().with_file(FIXTURE_PATH, text);
            Self {
                db: Database::open(backend, FIXTURE_PATH, DEFAULT_CAPACITY).unwrap(),
            }
        }

        pub fn with_record(mut self, system_name: &str, test_type: &str, result: TestResult) -> Self {
            let table = self.db.table_mut();
            let id = table.next_id_and_advance().unwrap();
            table
                .append(Record::new(id, system_name.into(), test_type.into(), result))
                .unwrap();
            self.db.commit().unwrap();
            self
        }

        pub fn with_deleted_record(mut self, system_name: &str, test_type: &str) -> Self {
            let table = self.db.table_mut();
            let id = table.next_id_and_advance().unwrap();
            let mut record = Record::new(id, system_name.into(), test_type.into(), TestResult::Pending);
            record.active = false;
            table.append(record).unwrap();
            self.db.commit().unwrap();
            self
        }

        pub fn fail_writes(&self) {
            self.db.backend().set_simulate_write_error(true);
        }

        /// Current contents of the backing file.
        pub fn file_text(&self) -> String {
            self.db
                .backend()
                .read(Path::new(FIXTURE_PATH))
                .unwrap()
                .unwrap_or_default()
        }
    }
}
