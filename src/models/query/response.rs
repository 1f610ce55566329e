// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    codec::{ByteReader, ByteWriter, CodecError},
    models::{common::MessagePayload, message_type::MessageType},
};

/// QUERY_RESPONSE payload: a success byte, then either a result table or an
/// error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResponse {
    Ok {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Err {
        error_message: String,
    },
}

impl QueryResponse {
    pub fn ok(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::Ok { columns, rows }
    }

    /// Result of a DDL operation: no columns, no rows.
    pub fn empty() -> Self {
        Self::Ok {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Result of a DML write: a one-cell `affected_rows` table.
    pub fn affected(count: usize) -> Self {
        Self::Ok {
            columns: vec!["affected_rows".to_owned()],
            rows: vec![vec![count.to_string()]],
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Err {
            error_message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn decode_payload(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        if !r.read_bool()? {
            return Ok(Self::Err {
                error_message: r.read_string()?,
            });
        }

        let n_cols = r.read_u32()? as usize;
        let mut columns = Vec::with_capacity(n_cols.min(1024));
        for _ in 0..n_cols {
            columns.push(r.read_string()?);
        }

        let n_rows = r.read_u32()? as usize;
        let mut rows = Vec::with_capacity(n_rows.min(4096));
        for _ in 0..n_rows {
            let n_cells = r.read_u32()? as usize;
            let mut row = Vec::with_capacity(n_cells.min(1024));
            for _ in 0..n_cells {
                row.push(r.read_string()?);
            }
            rows.push(row);
        }

        Ok(Self::Ok { columns, rows })
    }
}

impl MessagePayload for QueryResponse {
    fn message_type(&self) -> MessageType {
        MessageType::QueryResponse
    }

    fn encode_payload(&self, w: &mut ByteWriter) {
        match self {
            Self::Ok { columns, rows } => {
                w.put_bool(true);
                w.put_u32(columns.len() as u32);
                for name in columns {
                    w.put_string(name);
                }
                w.put_u32(rows.len() as u32);
                for row in rows {
                    w.put_u32(row.len() as u32);
                    for cell in row {
                        w.put_string(cell);
                    }
                }
            },
            Self::Err { error_message } => {
                w.put_bool(false);
                w.put_string(error_message);
            },
        }
    }
}
