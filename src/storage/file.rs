// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    engine::{table::Table, txn::LogEntry},
    models::data_types::ColumnDef,
    storage::{StorageBackend, error::StorageError},
};

const META_SUFFIX: &str = ".meta.json";
const ROWS_SUFFIX: &str = ".rows.json";
const PK_SUFFIX: &str = ".pk.json";
const TXN_LOG: &str = "txn.log";

/// Primary-key index descriptor persisted next to the table data.
#[derive(Debug, Serialize, Deserialize)]
struct PkDescriptor {
    column: String,
}

/// One directory per database; per table a metadata artifact, a data
/// artifact, and an optional primary-key descriptor. A `txn.log` of JSON
/// lines exists only while a transaction is active.
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn db_dir(&self, db: &str) -> PathBuf {
        self.root.join(db)
    }

    fn require_db(&self, db: &str) -> Result<PathBuf, StorageError> {
        let dir = self.db_dir(db);
        if !dir.is_dir() {
            return Err(StorageError::DatabaseNotFound(db.to_owned()));
        }
        Ok(dir)
    }

    fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, StorageError> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(value).map_err(|e| StorageError::Corrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(path, raw)?;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn create_db(&self, db: &str) -> Result<(), StorageError> {
        fs::create_dir_all(self.db_dir(db))?;
        Ok(())
    }

    fn drop_db(&self, db: &str) -> Result<(), StorageError> {
        let dir = self.require_db(db)?;
        fs::remove_dir_all(dir)?;
        Ok(())
    }

    fn db_exists(&self, db: &str) -> bool {
        self.db_dir(db).is_dir()
    }

    fn list_tables(&self, db: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.require_db(db)?;
        let mut tables = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(table) = name.strip_suffix(META_SUFFIX) {
                tables.push(table.to_owned());
            }
        }
        tables.sort();
        Ok(tables)
    }

    fn load_table(&self, db: &str, table: &str) -> Result<Table, StorageError> {
        let dir = self.require_db(db)?;
        let meta_path = dir.join(format!("{table}{META_SUFFIX}"));
        if !meta_path.is_file() {
            return Err(StorageError::TableNotFound {
                db: db.to_owned(),
                table: table.to_owned(),
            });
        }

        let columns: Vec<ColumnDef> = Self::read_json(&meta_path)?;
        let rows_path = dir.join(format!("{table}{ROWS_SUFFIX}"));
        let rows: Vec<Vec<String>> = if rows_path.is_file() {
            Self::read_json(&rows_path)?
        } else {
            Vec::new()
        };

        for row in &rows {
            if row.len() != columns.len() {
                return Err(StorageError::Corrupt {
                    path: rows_path.display().to_string(),
                    reason: format!(
                        "row width {} does not match {} column(s)",
                        row.len(),
                        columns.len()
                    ),
                });
            }
        }

        Ok(Table {
            name: table.to_owned(),
            columns,
            rows,
        })
    }

    fn save_table(&self, db: &str, table: &Table) -> Result<(), StorageError> {
        let dir = self.require_db(db)?;
        Self::write_json(&dir.join(format!("{}{META_SUFFIX}", table.name)), &table.columns)?;
        Self::write_json(&dir.join(format!("{}{ROWS_SUFFIX}", table.name)), &table.rows)?;

        let pk_path = dir.join(format!("{}{PK_SUFFIX}", table.name));
        match table.primary_key_index() {
            Some(idx) => Self::write_json(
                &pk_path,
                &PkDescriptor {
                    column: table.columns[idx].name.clone(),
                },
            )?,
            None => {
                if pk_path.is_file() {
                    fs::remove_file(&pk_path)?;
                }
            },
        }
        Ok(())
    }

    fn drop_table(&self, db: &str, table: &str) -> Result<(), StorageError> {
        let dir = self.require_db(db)?;
        for suffix in [META_SUFFIX, ROWS_SUFFIX, PK_SUFFIX] {
            let path = dir.join(format!("{table}{suffix}"));
            if path.is_file() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn create_log(&self, db: &str, _txn_id: u64) -> Result<(), StorageError> {
        let dir = self.require_db(db)?;
        fs::write(dir.join(TXN_LOG), b"")?;
        Ok(())
    }

    fn append_log(&self, db: &str, entry: &LogEntry) -> Result<(), StorageError> {
        let dir = self.require_db(db)?;
        let line = serde_json::to_string(entry).map_err(|e| StorageError::Corrupt {
            path: TXN_LOG.to_owned(),
            reason: e.to_string(),
        })?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(TXN_LOG))?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn delete_log(&self, db: &str) -> Result<(), StorageError> {
        let path = self.db_dir(db).join(TXN_LOG);
        if path.is_file() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
