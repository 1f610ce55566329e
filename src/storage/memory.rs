// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    collections::HashMap,
    sync::Mutex,
};

use crate::{
    engine::{table::Table, txn::LogEntry},
    storage::{StorageBackend, error::StorageError},
};

#[derive(Debug, Default)]
struct Inner {
    dbs: HashMap<String, HashMap<String, Table>>,
    logs: HashMap<String, Vec<LogEntry>>,
}

/// Heap-backed [`StorageBackend`] used by engine tests: same contract as the
/// file backend, no filesystem.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // a poisoned lock only happens after a panic in this module
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageBackend for MemoryBackend {
    fn create_db(&self, db: &str) -> Result<(), StorageError> {
        self.lock().dbs.entry(db.to_owned()).or_default();
        Ok(())
    }

    fn drop_db(&self, db: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        inner
            .dbs
            .remove(db)
            .ok_or_else(|| StorageError::DatabaseNotFound(db.to_owned()))?;
        inner.logs.remove(db);
        Ok(())
    }

    fn db_exists(&self, db: &str) -> bool {
        self.lock().dbs.contains_key(db)
    }

    fn list_tables(&self, db: &str) -> Result<Vec<String>, StorageError> {
        let inner = self.lock();
        let tables = inner
            .dbs
            .get(db)
            .ok_or_else(|| StorageError::DatabaseNotFound(db.to_owned()))?;
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn load_table(&self, db: &str, table: &str) -> Result<Table, StorageError> {
        let inner = self.lock();
        inner
            .dbs
            .get(db)
            .ok_or_else(|| StorageError::DatabaseNotFound(db.to_owned()))?
            .get(table)
            .cloned()
            .ok_or_else(|| StorageError::TableNotFound {
                db: db.to_owned(),
                table: table.to_owned(),
            })
    }

    fn save_table(&self, db: &str, table: &Table) -> Result<(), StorageError> {
        let mut inner = self.lock();
        let tables = inner
            .dbs
            .get_mut(db)
            .ok_or_else(|| StorageError::DatabaseNotFound(db.to_owned()))?;
        tables.insert(table.name.clone(), table.clone());
        Ok(())
    }

    fn drop_table(&self, db: &str, table: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        let tables = inner
            .dbs
            .get_mut(db)
            .ok_or_else(|| StorageError::DatabaseNotFound(db.to_owned()))?;
        tables.remove(table);
        Ok(())
    }

    fn create_log(&self, db: &str, _txn_id: u64) -> Result<(), StorageError> {
        self.lock().logs.insert(db.to_owned(), Vec::new());
        Ok(())
    }

    fn append_log(&self, db: &str, entry: &LogEntry) -> Result<(), StorageError> {
        self.lock()
            .logs
            .entry(db.to_owned())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    fn delete_log(&self, db: &str) -> Result<(), StorageError> {
        self.lock().logs.remove(db);
        Ok(())
    }
}
