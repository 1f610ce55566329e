// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    codec::{ByteReader, ByteWriter, CodecError},
    models::{
        common::MessagePayload,
        data_types::{ColumnDef, Literal, Operation, SetClause, WhereClause},
        message_type::MessageType,
    },
};

/// QUERY_REQUEST payload.
///
/// Wire layout: `u8 operation, string session_token, string db_name,
/// string table_name, u32 n_cols [ColumnDef…], u32 n_select [string…],
/// u32 n_insert [Literal…], u32 n_update [SetClause…], u8 has_where
/// [WhereClause]`. Unused sections are encoded as zero-length lists, so a
/// single layout serves every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub operation: Operation,
    pub session_token: String,
    pub db_name: String,
    pub table_name: String,
    /// Column definitions for CREATE TABLE.
    pub columns: Vec<ColumnDef>,
    /// Projection list for SELECT; empty means all columns.
    pub select_columns: Vec<String>,
    /// Positional values for INSERT.
    pub insert_values: Vec<Literal>,
    /// Assignments for UPDATE.
    pub update_clauses: Vec<SetClause>,
    pub where_clause: Option<WhereClause>,
}

impl QueryRequest {
    /// Bare request for the given operation; callers fill in the sections
    /// their operation uses.
    pub fn new(operation: Operation, session_token: impl Into<String>) -> Self {
        Self {
            operation,
            session_token: session_token.into(),
            db_name: String::new(),
            table_name: String::new(),
            columns: Vec::new(),
            select_columns: Vec::new(),
            insert_values: Vec::new(),
            update_clauses: Vec::new(),
            where_clause: None,
        }
    }

    pub fn decode_payload(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let raw_op = r.read_u8()?;
        let operation =
            Operation::from_u8(raw_op).ok_or(CodecError::InvalidFormat("operation"))?;
        let session_token = r.read_string()?;
        let db_name = r.read_string()?;
        let table_name = r.read_string()?;

        let n_cols = r.read_u32()? as usize;
        let mut columns = Vec::with_capacity(n_cols.min(1024));
        for _ in 0..n_cols {
            columns.push(ColumnDef::decode(r)?);
        }

        let n_select = r.read_u32()? as usize;
        let mut select_columns = Vec::with_capacity(n_select.min(1024));
        for _ in 0..n_select {
            select_columns.push(r.read_string()?);
        }

        let n_insert = r.read_u32()? as usize;
        let mut insert_values = Vec::with_capacity(n_insert.min(1024));
        for _ in 0..n_insert {
            insert_values.push(Literal::decode(r)?);
        }

        let n_update = r.read_u32()? as usize;
        let mut update_clauses = Vec::with_capacity(n_update.min(1024));
        for _ in 0..n_update {
            update_clauses.push(SetClause::decode(r)?);
        }

        let where_clause = if r.read_bool()? {
            Some(WhereClause::decode(r)?)
        } else {
            None
        };

        Ok(Self {
            operation,
            session_token,
            db_name,
            table_name,
            columns,
            select_columns,
            insert_values,
            update_clauses,
            where_clause,
        })
    }
}

impl MessagePayload for Box<QueryRequest> {
    fn message_type(&self) -> MessageType {
        self.as_ref().message_type()
    }

    fn encode_payload(&self, w: &mut ByteWriter) {
        self.as_ref().encode_payload(w);
    }
}

impl MessagePayload for QueryRequest {
    fn message_type(&self) -> MessageType {
        MessageType::QueryRequest
    }

    fn encode_payload(&self, w: &mut ByteWriter) {
        w.put_u8(self.operation as u8);
        w.put_string(&self.session_token);
        w.put_string(&self.db_name);
        w.put_string(&self.table_name);

        w.put_u32(self.columns.len() as u32);
        for col in &self.columns {
            col.encode(w);
        }

        w.put_u32(self.select_columns.len() as u32);
        for name in &self.select_columns {
            w.put_string(name);
        }

        w.put_u32(self.insert_values.len() as u32);
        for value in &self.insert_values {
            value.encode(w);
        }

        w.put_u32(self.update_clauses.len() as u32);
        for clause in &self.update_clauses {
            clause.encode(w);
        }

        match &self.where_clause {
            Some(clause) => {
                w.put_bool(true);
                clause.encode(w);
            },
            None => w.put_bool(false),
        }
    }
}
