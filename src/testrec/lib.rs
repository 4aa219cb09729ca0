//! # Testrec Architecture
//!
//! Testrec keeps a flat table of test records in a plain CSV file. It is a
//! library with a CLI client on top; everything the CLI does goes through the
//! library's API.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, renders tables and messages   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Turns typed-in ids into validated ids                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - add, update (edit sessions), delete, purge, recover,     │
//! │    search, list, get                                        │
//! │  - validate -> snapshot -> mutate -> commit -> rollback     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/, codec.rs)                           │
//! │  - RecordTable: in-memory table and its invariants          │
//! │  - Database: table bound to a file, whole-file commits      │
//! │  - StorageBackend: FsBackend (atomic), MemBackend (tests)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Record Lifecycle
//!
//! A record is created active, can be soft-deleted (hidden from listings and
//! search but kept), recovered, and finally purged. Purging is only allowed for
//! records that are already soft-deleted. Ids are handed out once and never
//! reused, not even after a purge or a failed save.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`store`]: Record table, backends and the file-bound database
//! - [`codec`]: The CSV file format
//! - [`model`]: `Record` and `TestResult`
//! - [`validation`]: Field and id validation rules
//! - [`input`]: Prompting with a bounded retry budget
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod store;
pub mod validation;
