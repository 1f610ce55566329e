// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use serde::{Deserialize, Serialize};

use crate::{engine::error::EngineError, models::data_types::ColumnDef};

/// One record, cell per column in declaration order. Cells are stored as
/// strings; the column's declared type drives comparison and sorting.
pub type Row = Vec<String>;

/// An in-memory table: ordered columns plus the rows that match them.
///
/// Invariants held by construction: every row is exactly as wide as the
/// column list, column names are unique, and at most one column is marked as
/// the primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Result<Self, EngineError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EngineError::EmptyTableName);
        }
        if columns.is_empty() {
            return Err(EngineError::NoColumns);
        }

        let mut primary_keys = 0usize;
        for (i, col) in columns.iter().enumerate() {
            if col.is_primary_key {
                primary_keys += 1;
            }
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(EngineError::DuplicateColumn(col.name.clone()));
            }
        }
        if primary_keys > 1 {
            return Err(EngineError::TooManyPrimaryKeys(name));
        }

        Ok(Self {
            name,
            columns,
            rows: Vec::new(),
        })
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }

    pub fn column(&self, column: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == column)
    }

    pub fn primary_key_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.is_primary_key)
    }

    /// Reject `row` when it would duplicate an existing primary-key value.
    pub fn check_primary_key(&self, row: &Row) -> Result<(), EngineError> {
        let Some(pk) = self.primary_key_index() else {
            return Ok(());
        };
        let candidate = &row[pk];
        if self.rows.iter().any(|existing| &existing[pk] == candidate) {
            return Err(EngineError::DuplicatePrimaryKey {
                table: self.name.clone(),
                value: candidate.clone(),
            });
        }
        Ok(())
    }

    /// Append a column; existing rows are padded with the type default.
    pub fn add_column(&mut self, def: ColumnDef) -> Result<(), EngineError> {
        if self.column_index(&def.name).is_some() {
            return Err(EngineError::DuplicateColumn(def.name));
        }
        if def.is_primary_key && self.primary_key_index().is_some() {
            return Err(EngineError::TooManyPrimaryKeys(self.name.clone()));
        }
        let default = def.data_type.default_value().to_owned();
        for row in &mut self.rows {
            row.push(default.clone());
        }
        self.columns.push(def);
        Ok(())
    }
}
