// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

#![allow(clippy::module_inception)]

pub mod catalog;
pub mod engine;
pub mod error;
pub mod table;
pub mod txn;
pub mod where_expr;

pub use engine::{Engine, RowValues};
pub use error::EngineError;

use crate::engine::txn::TxnState;

/// Mutable state owned by one session: which database is selected and the
/// transaction slot. Only the session's own connection task touches it.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    pub current_database: Option<String>,
    pub txn: TxnState,
}
