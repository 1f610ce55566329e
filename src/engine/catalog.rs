// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::collections::HashMap;

use crate::engine::{error::EngineError, table::Table};

/// One database: a named set of tables.
#[derive(Debug, Default, Clone)]
pub struct Database {
    pub tables: HashMap<String, Table>,
}

/// The process-wide catalog. Callers mutate it only under the engine lock;
/// which database is "current" is session state, not catalog state.
#[derive(Debug, Default)]
pub struct Catalog {
    databases: HashMap<String, Database>,
}

impl Catalog {
    pub fn contains(&self, db: &str) -> bool {
        self.databases.contains_key(db)
    }

    pub fn insert(&mut self, name: String, db: Database) {
        self.databases.insert(name, db);
    }

    pub fn remove(&mut self, db: &str) -> Option<Database> {
        self.databases.remove(db)
    }

    pub fn database(&self, db: &str) -> Result<&Database, EngineError> {
        self.databases
            .get(db)
            .ok_or_else(|| EngineError::DatabaseNotFound(db.to_owned()))
    }

    pub fn database_mut(&mut self, db: &str) -> Result<&mut Database, EngineError> {
        self.databases
            .get_mut(db)
            .ok_or_else(|| EngineError::DatabaseNotFound(db.to_owned()))
    }

    pub fn database_names(&self) -> Vec<&str> {
        self.databases.keys().map(String::as_str).collect()
    }
}

impl Database {
    pub fn table(&self, name: &str) -> Result<&Table, EngineError> {
        self.tables
            .get(name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_owned()))
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table, EngineError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_owned()))
    }
}
