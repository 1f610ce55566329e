// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database '{0}' is not present in storage")]
    DatabaseNotFound(String),

    #[error("table '{table}' of database '{db}' is not present in storage")]
    TableNotFound { db: String, table: String },

    #[error("persisted artifact {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
}
