// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Typed sub-records shared by the query messages: scalar types, literals,
//! column definitions, SET clauses and the structured WHERE clause.
//!
//! All values travel as strings on the wire; the [`DataType`] byte says how a
//! value is interpreted at comparison or projection time. The same structs
//! double as the engine's column metadata, which is why they carry serde
//! derives for the persistence layer.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{ByteReader, ByteWriter, CodecError};

/// Scalar type of a column or literal, one byte on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Int = 0x01,
    Double = 0x02,
    String = 0x03,
    Bool = 0x04,
}

impl DataType {
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0x01 => Self::Int,
            0x02 => Self::Double,
            0x03 => Self::String,
            0x04 => Self::Bool,
            _ => return None,
        })
    }

    /// Value used when an INSERT leaves a column unset.
    pub fn default_value(self) -> &'static str {
        match self {
            Self::Int | Self::Bool => "0",
            Self::Double => "0.0",
            Self::String => "",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "INT",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
            Self::Bool => "BOOL",
        })
    }
}

/// A typed value: `u8 type, string value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub data_type: DataType,
    pub value: String,
}

impl Literal {
    pub fn new(data_type: DataType, value: impl Into<String>) -> Self {
        Self {
            data_type,
            value: value.into(),
        }
    }

    pub fn encode(&self, w: &mut ByteWriter) {
        w.put_u8(self.data_type as u8);
        w.put_string(&self.value);
    }

    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let raw = r.read_u8()?;
        let data_type =
            DataType::from_u8(raw).ok_or(CodecError::InvalidFormat("data type"))?;
        let value = r.read_string()?;
        Ok(Self { data_type, value })
    }
}

/// Column definition: `string name, u8 type, u8 is_primary`.
///
/// Per table at most one column may set `is_primary_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub is_primary_key: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType, is_primary_key: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_primary_key,
        }
    }

    pub fn encode(&self, w: &mut ByteWriter) {
        w.put_string(&self.name);
        w.put_u8(self.data_type as u8);
        w.put_bool(self.is_primary_key);
    }

    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let name = r.read_string()?;
        let raw = r.read_u8()?;
        let data_type =
            DataType::from_u8(raw).ok_or(CodecError::InvalidFormat("data type"))?;
        let is_primary_key = r.read_bool()?;
        Ok(Self {
            name,
            data_type,
            is_primary_key,
        })
    }
}

/// One `SET column = value` assignment of an UPDATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetClause {
    pub column: String,
    pub value: Literal,
}

impl SetClause {
    pub fn encode(&self, w: &mut ByteWriter) {
        w.put_string(&self.column);
        self.value.encode(w);
    }

    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            column: r.read_string()?,
            value: Literal::decode(r)?,
        })
    }
}

/// Structured single comparison: `string column, string operator, Literal`.
///
/// The wire carries exactly one comparison; the engine-side evaluator also
/// understands `AND`/`OR` chains supplied as text (see
/// [`crate::engine::where_expr`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub column: String,
    pub operator: String,
    pub value: Literal,
}

impl WhereClause {
    pub fn encode(&self, w: &mut ByteWriter) {
        w.put_string(&self.column);
        w.put_string(&self.operator);
        self.value.encode(w);
    }

    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            column: r.read_string()?,
            operator: r.read_string()?,
            value: Literal::decode(r)?,
        })
    }

    /// Render to the evaluator's text form, quoting STRING literals.
    pub fn as_condition(&self) -> String {
        match self.value.data_type {
            DataType::String => {
                format!("{} {} '{}'", self.column, self.operator, self.value.value)
            },
            _ => format!("{} {} {}", self.column, self.operator, self.value.value),
        }
    }
}

/// Operation byte of a QUERY_REQUEST.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    CreateDatabase = 0x01,
    DropDatabase = 0x02,
    UseDatabase = 0x03,
    CreateTable = 0x04,
    DropTable = 0x05,
    Insert = 0x10,
    Select = 0x11,
    Update = 0x12,
    Delete = 0x13,
}

impl Operation {
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0x01 => Self::CreateDatabase,
            0x02 => Self::DropDatabase,
            0x03 => Self::UseDatabase,
            0x04 => Self::CreateTable,
            0x05 => Self::DropTable,
            0x10 => Self::Insert,
            0x11 => Self::Select,
            0x12 => Self::Update,
            0x13 => Self::Delete,
            _ => return None,
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CreateDatabase => "CREATE DATABASE",
            Self::DropDatabase => "DROP DATABASE",
            Self::UseDatabase => "USE DATABASE",
            Self::CreateTable => "CREATE TABLE",
            Self::DropTable => "DROP TABLE",
            Self::Insert => "INSERT",
            Self::Select => "SELECT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        })
    }
}
