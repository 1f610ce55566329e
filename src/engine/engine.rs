// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The query engine: one owned value holding the catalog and the storage
//! backend, exposing DDL, DML and transaction control directly.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    engine::{
        SessionState,
        catalog::{Catalog, Database},
        error::EngineError,
        table::{Row, Table},
        txn::LogEntry,
        where_expr::{WhereExpr, compare_typed},
    },
    models::data_types::ColumnDef,
    storage::StorageBackend,
};

/// Values for one INSERT: positional (declaration order, tail may be
/// omitted) or named (any subset of columns).
#[derive(Debug, Clone)]
pub enum RowValues {
    Positional(Vec<String>),
    Named(Vec<(String, String)>),
}

pub struct Engine {
    catalog: Catalog,
    storage: Box<dyn StorageBackend>,
    next_txn_id: u64,
}

impl Engine {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            catalog: Catalog::default(),
            storage,
            next_txn_id: 0,
        }
    }

    /// True when the database exists in memory or on disk.
    pub fn has_database(&self, name: &str) -> bool {
        self.catalog.contains(name) || self.storage.db_exists(name)
    }

    // ── DDL ──────────────────────────────────────────────────────────────

    pub fn create_database(&mut self, name: &str) -> Result<(), EngineError> {
        if name.is_empty() {
            return Err(EngineError::EmptyDatabaseName);
        }
        if self.has_database(name) {
            return Err(EngineError::DatabaseAlreadyExists(name.to_owned()));
        }
        self.storage.create_db(name)?;
        self.catalog.insert(name.to_owned(), Database::default());
        debug!(db = name, "database created");
        Ok(())
    }

    pub fn drop_database(
        &mut self,
        name: &str,
        session: &mut SessionState,
    ) -> Result<(), EngineError> {
        if !self.has_database(name) {
            return Err(EngineError::DatabaseNotFound(name.to_owned()));
        }
        self.storage.drop_db(name)?;
        self.catalog.remove(name);
        if session.current_database.as_deref() == Some(name) {
            if session.txn.active {
                session.txn.close();
            }
            session.current_database = None;
        }
        debug!(db = name, "database dropped");
        Ok(())
    }

    /// Select a database for the session, loading its tables from
    /// persistence if they are not resident yet.
    pub fn use_database(
        &mut self,
        name: &str,
        session: &mut SessionState,
    ) -> Result<(), EngineError> {
        if !self.catalog.contains(name) {
            if !self.storage.db_exists(name) {
                return Err(EngineError::DatabaseNotFound(name.to_owned()));
            }
            let mut db = Database::default();
            for table_name in self.storage.list_tables(name)? {
                let table = self.storage.load_table(name, &table_name)?;
                db.tables.insert(table_name, table);
            }
            self.catalog.insert(name.to_owned(), db);
        }
        session.current_database = Some(name.to_owned());
        Ok(())
    }

    pub fn create_table(
        &mut self,
        session: &SessionState,
        name: &str,
        columns: Vec<ColumnDef>,
    ) -> Result<(), EngineError> {
        let db_name = Self::current_db_name(session)?.to_owned();
        let db = self.catalog.database_mut(&db_name)?;
        if db.tables.contains_key(name) {
            return Err(EngineError::TableAlreadyExists(name.to_owned()));
        }
        let table = Table::new(name, columns)?;
        self.storage.save_table(&db_name, &table)?;
        self.catalog
            .database_mut(&db_name)?
            .tables
            .insert(name.to_owned(), table);
        Ok(())
    }

    pub fn drop_table(
        &mut self,
        session: &SessionState,
        name: &str,
    ) -> Result<(), EngineError> {
        let db_name = Self::current_db_name(session)?.to_owned();
        if !self.catalog.database(&db_name)?.tables.contains_key(name) {
            return Err(EngineError::TableNotFound(name.to_owned()));
        }
        self.storage.drop_table(&db_name, name)?;
        self.catalog.database_mut(&db_name)?.tables.remove(name);
        Ok(())
    }

    /// Append a column to an existing table and persist the new shape.
    pub fn alter_table_add_column(
        &mut self,
        session: &SessionState,
        table_name: &str,
        def: ColumnDef,
    ) -> Result<(), EngineError> {
        let db_name = Self::current_db_name(session)?.to_owned();
        let table = self.catalog.database_mut(&db_name)?.table_mut(table_name)?;
        table.add_column(def)?;
        self.storage.save_table(&db_name, table)?;
        Ok(())
    }

    // ── DML ──────────────────────────────────────────────────────────────

    pub fn insert(
        &mut self,
        session: &mut SessionState,
        table_name: &str,
        values: RowValues,
    ) -> Result<usize, EngineError> {
        let db_name = Self::current_db_name(session)?.to_owned();
        let table = self.catalog.database_mut(&db_name)?.table_mut(table_name)?;

        let row = build_row(table, values)?;
        table.check_primary_key(&row)?;
        table.rows.push(row.clone());

        self.record_txn(
            session,
            LogEntry::Insert {
                table: table_name.to_owned(),
                row,
            },
        );
        Ok(1)
    }

    pub fn update(
        &mut self,
        session: &mut SessionState,
        table_name: &str,
        assignments: &[(String, String)],
        condition: Option<&str>,
    ) -> Result<usize, EngineError> {
        let db_name = Self::current_db_name(session)?.to_owned();
        let expr = parse_condition(condition)?;
        let table = self.catalog.database_mut(&db_name)?.table_mut(table_name)?;

        // resolve assignment targets once; unknown columns are skipped
        let mut resolved: Vec<(usize, &str)> = Vec::with_capacity(assignments.len());
        for (column, value) in assignments {
            match table.column_index(column) {
                Some(idx) => resolved.push((idx, value.as_str())),
                None => warn!(
                    table = table_name,
                    column = column.as_str(),
                    "skipping assignment to a column the table does not have"
                ),
            }
        }

        let mut touched = 0usize;
        let mut log_entries = Vec::new();
        for (row_index, row) in table.rows.iter_mut().enumerate() {
            if !expr.matches_row(&table.columns, row) {
                continue;
            }
            touched += 1;
            let old_row = row.clone();
            for (idx, value) in &resolved {
                row[*idx] = (*value).to_owned();
            }
            log_entries.push(LogEntry::Update {
                table: table_name.to_owned(),
                row_index,
                old_row,
                new_row: row.clone(),
            });
        }

        for entry in log_entries {
            self.record_txn(session, entry);
        }
        Ok(touched)
    }

    pub fn delete(
        &mut self,
        session: &mut SessionState,
        table_name: &str,
        condition: Option<&str>,
    ) -> Result<usize, EngineError> {
        let db_name = Self::current_db_name(session)?.to_owned();
        let expr = parse_condition(condition)?;
        let table = self.catalog.database_mut(&db_name)?.table_mut(table_name)?;

        let mut kept = Vec::with_capacity(table.rows.len());
        let mut removed = Vec::new();
        for row in table.rows.drain(..) {
            if expr.matches_row(&table.columns, &row) {
                removed.push(row);
            } else {
                kept.push(row);
            }
        }
        table.rows = kept;

        let count = removed.len();
        for old_row in removed {
            self.record_txn(
                session,
                LogEntry::Delete {
                    table: table_name.to_owned(),
                    old_row,
                },
            );
        }
        Ok(count)
    }

    pub fn select(
        &self,
        session: &SessionState,
        table_name: &str,
        condition: Option<&str>,
        order_by: Option<&str>,
        projection: &[String],
    ) -> Result<(Vec<String>, Vec<Row>), EngineError> {
        let db_name = Self::current_db_name(session)?;
        let expr = parse_condition(condition)?;
        let table = self.catalog.database(db_name)?.table(table_name)?;

        let mut rows: Vec<Row> = table
            .rows
            .iter()
            .filter(|row| expr.matches(table, row))
            .cloned()
            .collect();

        if let Some(order_column) = order_by {
            match table.column_index(order_column) {
                Some(idx) => {
                    let data_type = table.columns[idx].data_type;
                    rows.sort_by(|a, b| compare_typed(data_type, &a[idx], &b[idx]));
                },
                None => warn!(
                    table = table_name,
                    column = order_column,
                    "ORDER BY names an unknown column; rows stay unsorted"
                ),
            }
        }

        if projection.is_empty() {
            let columns = table.columns.iter().map(|c| c.name.clone()).collect();
            return Ok((columns, rows));
        }

        let mut indices = Vec::with_capacity(projection.len());
        for name in projection {
            let idx = table.column_index(name).ok_or_else(|| {
                EngineError::ColumnNotFound {
                    table: table_name.to_owned(),
                    column: name.clone(),
                }
            })?;
            indices.push(idx);
        }
        let projected = rows
            .into_iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok((projection.to_vec(), projected))
    }

    // ── Transactions ─────────────────────────────────────────────────────

    pub fn begin_transaction(
        &mut self,
        session: &mut SessionState,
    ) -> Result<(), EngineError> {
        let db_name = Self::current_db_name(session)?.to_owned();
        if session.txn.active {
            return Err(EngineError::TransactionActive);
        }
        self.next_txn_id += 1;
        let txn_id = self.next_txn_id;
        self.storage.create_log(&db_name, txn_id)?;
        session.txn.open(txn_id);
        self.record_txn(session, LogEntry::Begin { txn_id });
        debug!(db = db_name.as_str(), txn_id, "transaction started");
        Ok(())
    }

    /// Persist every table of the current database, then drop the log.
    ///
    /// A table that fails to persist marks the transaction aborted: the
    /// in-memory state keeps the committed intent but the disk may lag.
    pub fn commit(&mut self, session: &mut SessionState) -> Result<(), EngineError> {
        let db_name = Self::current_db_name(session)?.to_owned();
        if !session.txn.active {
            return Err(EngineError::NoActiveTransaction);
        }

        let db = self.catalog.database(&db_name)?;
        for table in db.tables.values() {
            if let Err(source) = self.storage.save_table(&db_name, table) {
                session.txn.aborted = true;
                session.txn.close();
                if let Err(e) = self.storage.delete_log(&db_name) {
                    warn!(error = %e, "failed to remove the transaction log");
                }
                return Err(EngineError::CommitFailed {
                    table: table.name.clone(),
                    source,
                });
            }
        }

        self.storage.delete_log(&db_name)?;
        session.txn.close();
        debug!(db = db_name.as_str(), "transaction committed");
        Ok(())
    }

    /// Undo the transaction by replaying its log in reverse.
    pub fn rollback(&mut self, session: &mut SessionState) -> Result<(), EngineError> {
        let db_name = Self::current_db_name(session)?.to_owned();
        if !session.txn.active {
            return Err(EngineError::NoActiveTransaction);
        }

        let log = std::mem::take(&mut session.txn.log);
        let db = self.catalog.database_mut(&db_name)?;
        for entry in log.into_iter().rev() {
            match entry {
                LogEntry::Insert { table, row } => {
                    if let Ok(t) = db.table_mut(&table)
                        && let Some(pos) = t.rows.iter().rposition(|r| *r == row)
                    {
                        t.rows.remove(pos);
                    }
                },
                LogEntry::Delete { table, old_row } => {
                    if let Ok(t) = db.table_mut(&table) {
                        t.rows.push(old_row);
                    }
                },
                LogEntry::Update {
                    table,
                    row_index,
                    old_row,
                    ..
                } => {
                    if let Ok(t) = db.table_mut(&table)
                        && row_index < t.rows.len()
                    {
                        t.rows[row_index] = old_row;
                    }
                },
                LogEntry::Begin { .. }
                | LogEntry::Commit { .. }
                | LogEntry::Rollback { .. } => {},
            }
        }

        if let Err(e) = self.storage.delete_log(&db_name) {
            warn!(error = %e, "failed to remove the transaction log");
        }
        session.txn.close();
        debug!(db = db_name.as_str(), "transaction rolled back");
        Ok(())
    }

    // ── helpers ──────────────────────────────────────────────────────────

    fn current_db_name(session: &SessionState) -> Result<&str, EngineError> {
        session
            .current_database
            .as_deref()
            .ok_or(EngineError::NoDatabaseSelected)
    }

    fn record_txn(&self, session: &mut SessionState, entry: LogEntry) {
        if !session.txn.active {
            return;
        }
        if let Some(db) = session.current_database.as_deref()
            && let Err(e) = self.storage.append_log(db, &entry)
        {
            warn!(error = %e, "failed to append to the transaction log");
        }
        session.txn.record(entry);
    }
}

fn parse_condition(condition: Option<&str>) -> Result<WhereExpr, EngineError> {
    match condition {
        Some(text) => WhereExpr::parse(text),
        None => Ok(WhereExpr::default()),
    }
}

/// Materialize an insert into a full-width row, defaulting unset columns.
fn build_row(table: &Table, values: RowValues) -> Result<Row, EngineError> {
    match values {
        RowValues::Positional(given) => {
            if given.len() > table.columns.len() {
                return Err(EngineError::TooManyValues {
                    table: table.name.clone(),
                    given: given.len(),
                    expected: table.columns.len(),
                });
            }
            let mut row = given;
            for col in &table.columns[row.len()..] {
                row.push(col.data_type.default_value().to_owned());
            }
            Ok(row)
        },
        RowValues::Named(pairs) => {
            let mut by_name: HashMap<&str, &str> = HashMap::with_capacity(pairs.len());
            for (column, value) in &pairs {
                if table.column_index(column).is_none() {
                    return Err(EngineError::ColumnNotFound {
                        table: table.name.clone(),
                        column: column.clone(),
                    });
                }
                by_name.insert(column.as_str(), value.as_str());
            }
            Ok(table
                .columns
                .iter()
                .map(|col| match by_name.get(col.name.as_str()) {
                    Some(v) => (*v).to_owned(),
                    None => col.data_type.default_value().to_owned(),
                })
                .collect())
        },
    }
}
