// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Text form of row predicates: `OR` over `AND` over single comparisons,
//! no parentheses.
//!
//! ```text
//! expr := expr ' OR ' expr | expr ' AND ' expr | cmp
//! cmp  := column op literal          op ∈ { = != > < >= <= }
//! ```
//!
//! Literals are bare tokens or single-quoted strings (quotes stripped).
//! Evaluation is total: once a condition parses, matching a row always
//! produces a boolean. Missing columns, failed typed parses and undefined
//! operator/type combinations all evaluate to `false`.

use std::cmp::Ordering;

use tracing::warn;

use crate::{
    engine::{
        error::EngineError,
        table::{Row, Table},
    },
    models::data_types::{ColumnDef, DataType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CmpOp {
    fn parse(token: &str) -> Option<Self> {
        Some(match token {
            "=" => Self::Eq,
            "!=" => Self::Ne,
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">=" => Self::Ge,
            "<=" => Self::Le,
            _ => return None,
        })
    }

    fn of_ordering(self, ord: Ordering) -> bool {
        match self {
            Self::Eq => ord == Ordering::Equal,
            Self::Ne => ord != Ordering::Equal,
            Self::Gt => ord == Ordering::Greater,
            Self::Lt => ord == Ordering::Less,
            Self::Ge => ord != Ordering::Less,
            Self::Le => ord != Ordering::Greater,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Comparison {
    column: String,
    op: CmpOp,
    literal: String,
}

impl Comparison {
    fn parse(text: &str) -> Result<Self, EngineError> {
        let mut parts = text.split_whitespace();
        let (Some(column), Some(op_token)) = (parts.next(), parts.next()) else {
            return Err(EngineError::WhereSyntax(text.trim().to_owned()));
        };
        let op = CmpOp::parse(op_token)
            .ok_or_else(|| EngineError::WhereSyntax(text.trim().to_owned()))?;

        // the literal may contain spaces when quoted, so rejoin the tail
        let literal_raw = parts.collect::<Vec<_>>().join(" ");
        if literal_raw.is_empty() {
            return Err(EngineError::WhereSyntax(text.trim().to_owned()));
        }
        let literal = strip_quotes(&literal_raw).to_owned();

        Ok(Self {
            column: column.to_owned(),
            op,
            literal,
        })
    }

    fn matches(&self, columns: &[ColumnDef], row: &Row) -> bool {
        let Some(idx) = columns.iter().position(|c| c.name == self.column) else {
            return false;
        };
        let cell = &row[idx];

        match columns[idx].data_type {
            DataType::Int => match (cell.parse::<i64>(), self.literal.parse::<i64>()) {
                (Ok(lhs), Ok(rhs)) => self.op.of_ordering(lhs.cmp(&rhs)),
                _ => false,
            },
            DataType::Double => match (cell.parse::<f64>(), self.literal.parse::<f64>()) {
                (Ok(lhs), Ok(rhs)) => match lhs.partial_cmp(&rhs) {
                    Some(ord) => self.op.of_ordering(ord),
                    None => false,
                },
                _ => false,
            },
            DataType::Bool => {
                if !matches!(self.op, CmpOp::Eq | CmpOp::Ne) {
                    warn!(
                        column = %self.column,
                        "ordering comparison on a BOOL column is undefined"
                    );
                    return false;
                }
                match (parse_bool(cell), parse_bool(&self.literal)) {
                    (Some(lhs), Some(rhs)) => self.op.of_ordering(lhs.cmp(&rhs)),
                    _ => false,
                }
            },
            DataType::String => self.op.of_ordering(cell.as_str().cmp(self.literal.as_str())),
        }
    }
}

fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(raw)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "true" | "TRUE" => Some(true),
        "0" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

/// A parsed condition: disjunction of conjunctions of comparisons.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereExpr {
    groups: Vec<Vec<Comparison>>,
}

impl WhereExpr {
    /// Parse a condition. The empty (or all-whitespace) condition matches
    /// every row.
    pub fn parse(condition: &str) -> Result<Self, EngineError> {
        if condition.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut groups = Vec::new();
        for group_text in condition.split(" OR ") {
            let mut group = Vec::new();
            for cmp_text in group_text.split(" AND ") {
                group.push(Comparison::parse(cmp_text)?);
            }
            groups.push(group);
        }
        Ok(Self { groups })
    }

    pub fn matches(&self, table: &Table, row: &Row) -> bool {
        self.matches_row(&table.columns, row)
    }

    /// Variant for callers that hold the row list mutably and can only share
    /// the column metadata.
    pub fn matches_row(&self, columns: &[ColumnDef], row: &Row) -> bool {
        if self.groups.is_empty() {
            return true;
        }
        self.groups
            .iter()
            .any(|group| group.iter().all(|cmp| cmp.matches(columns, row)))
    }
}

/// Ascending comparison of two cells under a column's declared type, used by
/// ORDER BY. Cells that fail a numeric parse compare as equal so sorting
/// stays total.
pub fn compare_typed(data_type: DataType, lhs: &str, rhs: &str) -> Ordering {
    match data_type {
        DataType::Int | DataType::Double => {
            match (lhs.parse::<f64>(), rhs.parse::<f64>()) {
                (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        },
        DataType::String | DataType::Bool => lhs.cmp(rhs),
    }
}
