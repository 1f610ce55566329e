// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The structured command records the SQL front end emits, and a small
//! session-holding client that maps them onto QUERY_REQUEST frames.
//!
//! Lexing and parsing of SQL text is out of scope here; anything able to
//! produce a [`Command`] can drive the server.

use anyhow::{Result, anyhow, bail};

use crate::{
    client::connection::ClientConnection,
    models::{
        data_types::{ColumnDef, Literal, Operation, SetClause, WhereClause},
        login::LoginRequest,
        parse::Message,
        query::{QueryRequest, QueryResponse},
        ping::PingRequest,
    },
    utils::now_millis,
};

/// One statement, already parsed. Maps 1:1 onto the QUERY_REQUEST layout.
#[derive(Debug, Clone)]
pub enum Command {
    CreateDatabase {
        name: String,
    },
    DropDatabase {
        name: String,
    },
    UseDatabase {
        name: String,
    },
    CreateTable {
        name: String,
        columns: Vec<ColumnDef>,
    },
    DropTable {
        name: String,
    },
    Insert {
        table: String,
        values: Vec<Literal>,
    },
    Select {
        table: String,
        /// Empty means `SELECT *`.
        columns: Vec<String>,
        where_clause: Option<WhereClause>,
    },
    Update {
        table: String,
        assignments: Vec<SetClause>,
        where_clause: Option<WhereClause>,
    },
    Delete {
        table: String,
        where_clause: Option<WhereClause>,
    },
}

impl Command {
    /// Fill a QUERY_REQUEST for this command under the given session token.
    pub fn into_request(self, session_token: &str) -> QueryRequest {
        match self {
            Self::CreateDatabase { name } => {
                let mut req = QueryRequest::new(Operation::CreateDatabase, session_token);
                req.db_name = name;
                req
            },
            Self::DropDatabase { name } => {
                let mut req = QueryRequest::new(Operation::DropDatabase, session_token);
                req.db_name = name;
                req
            },
            Self::UseDatabase { name } => {
                let mut req = QueryRequest::new(Operation::UseDatabase, session_token);
                req.db_name = name;
                req
            },
            Self::CreateTable { name, columns } => {
                let mut req = QueryRequest::new(Operation::CreateTable, session_token);
                req.table_name = name;
                req.columns = columns;
                req
            },
            Self::DropTable { name } => {
                let mut req = QueryRequest::new(Operation::DropTable, session_token);
                req.table_name = name;
                req
            },
            Self::Insert { table, values } => {
                let mut req = QueryRequest::new(Operation::Insert, session_token);
                req.table_name = table;
                req.insert_values = values;
                req
            },
            Self::Select {
                table,
                columns,
                where_clause,
            } => {
                let mut req = QueryRequest::new(Operation::Select, session_token);
                req.table_name = table;
                req.select_columns = columns;
                req.where_clause = where_clause;
                req
            },
            Self::Update {
                table,
                assignments,
                where_clause,
            } => {
                let mut req = QueryRequest::new(Operation::Update, session_token);
                req.table_name = table;
                req.update_clauses = assignments;
                req.where_clause = where_clause;
                req
            },
            Self::Delete {
                table,
                where_clause,
            } => {
                let mut req = QueryRequest::new(Operation::Delete, session_token);
                req.table_name = table;
                req.where_clause = where_clause;
                req
            },
        }
    }
}

/// A logged-in client: owns the connection and the session token.
pub struct SdsqlClient {
    conn: ClientConnection,
    token: Option<String>,
}

impl SdsqlClient {
    pub fn new(conn: ClientConnection) -> Self {
        Self { conn, token: None }
    }

    pub fn session_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Perform the login exchange and remember the issued token.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<u32> {
        let request = Message::from(LoginRequest::new(username, password));
        match self.conn.call(&request).await? {
            Message::LoginSuccess(ok) => {
                self.token = Some(ok.session_token);
                Ok(ok.user_id)
            },
            Message::LoginFailure(fail) => bail!("login failed: {}", fail.error_message),
            other => bail!("unexpected reply to LOGIN_REQUEST: {other:?}"),
        }
    }

    /// Send one command and return the server's QUERY_RESPONSE.
    ///
    /// Contract failures come back as `QueryResponse::Err`; only transport
    /// and protocol breakage turns into a Rust error.
    pub async fn execute(&self, command: Command) -> Result<QueryResponse> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| anyhow!("not logged in"))?;
        let request = Message::from(command.into_request(token));
        match self.conn.call(&request).await? {
            Message::QueryResponse(resp) => Ok(resp),
            Message::ErrorResponse(err) => bail!(
                "server rejected the request (code {}): {}",
                err.error_code,
                err.error_message
            ),
            other => bail!("unexpected reply to QUERY_REQUEST: {other:?}"),
        }
    }

    /// Round-trip latency probe; returns (client send ms, server ms).
    pub async fn ping(&self) -> Result<(u64, u64)> {
        let sent = now_millis();
        let request = Message::from(PingRequest { timestamp_ms: sent });
        match self.conn.call(&request).await? {
            Message::PongResponse(pong) => {
                Ok((pong.original_timestamp_ms, pong.server_timestamp_ms))
            },
            other => bail!("unexpected reply to PING_REQUEST: {other:?}"),
        }
    }
}
