// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

use crate::storage::error::StorageError;

/// Contract errors raised by DDL/DML execution. Every variant renders to a
/// message that names the object and the rule violated; these travel to the
/// client inside a failed QUERY_RESPONSE and never close the connection.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("database name must not be empty")]
    EmptyDatabaseName,

    #[error("database '{0}' already exists")]
    DatabaseAlreadyExists(String),

    #[error("database '{0}' does not exist")]
    DatabaseNotFound(String),

    #[error("no database selected")]
    NoDatabaseSelected,

    #[error("table name must not be empty")]
    EmptyTableName,

    #[error("table '{0}' already exists")]
    TableAlreadyExists(String),

    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    #[error("table must declare at least one column")]
    NoColumns,

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("table '{0}' would have more than one primary key column")]
    TooManyPrimaryKeys(String),

    #[error("duplicate primary key value '{value}' in table '{table}'")]
    DuplicatePrimaryKey { table: String, value: String },

    #[error("column '{column}' does not exist in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("row has {given} values but table '{table}' only has {expected} columns")]
    TooManyValues {
        table: String,
        given: usize,
        expected: usize,
    },

    #[error("malformed WHERE condition: {0}")]
    WhereSyntax(String),

    #[error("a transaction is already active")]
    TransactionActive,

    #[error("no active transaction")]
    NoActiveTransaction,

    #[error("commit failed to persist table '{table}': {source}")]
    CommitFailed {
        table: String,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
