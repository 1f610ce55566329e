// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Pluggable persistence for the catalog.
//!
//! The engine only ever talks to [`StorageBackend`]; anything that can
//! round-trip a table through `save_table`/`load_table` and keep a
//! transaction log alive while one is active will do. The crate ships a
//! directory-per-database file backend and an in-memory backend for tests.

pub mod error;
pub mod file;
pub mod memory;

use crate::engine::{table::Table, txn::LogEntry};
pub use error::StorageError;
pub use file::FileBackend;
pub use memory::MemoryBackend;

pub trait StorageBackend: Send + Sync {
    /// Create the persistence container for a new database.
    fn create_db(&self, db: &str) -> Result<(), StorageError>;

    /// Remove a database and every artifact under it.
    fn drop_db(&self, db: &str) -> Result<(), StorageError>;

    fn db_exists(&self, db: &str) -> bool;

    fn list_tables(&self, db: &str) -> Result<Vec<String>, StorageError>;

    fn load_table(&self, db: &str, table: &str) -> Result<Table, StorageError>;

    /// Truncate-and-rewrite the table's artifacts.
    fn save_table(&self, db: &str, table: &Table) -> Result<(), StorageError>;

    fn drop_table(&self, db: &str, table: &str) -> Result<(), StorageError>;

    /// Open a fresh transaction log; one log exists per database at a time.
    fn create_log(&self, db: &str, txn_id: u64) -> Result<(), StorageError>;

    fn append_log(&self, db: &str, entry: &LogEntry) -> Result<(), StorageError>;

    fn delete_log(&self, db: &str) -> Result<(), StorageError>;
}
