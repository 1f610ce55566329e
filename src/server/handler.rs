// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Per-connection request loop: receive one message, execute it to
//! completion, write one response, repeat until the client goes away.

use std::net::SocketAddr;

use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    auth::{AuthError, ObjectType, Session, required_permission},
    engine::RowValues,
    models::{
        common::MessagePayload,
        data_types::{Operation, WhereClause},
        login::{LoginFailure, LoginRequest, LoginSuccess},
        parse::Message,
        ping::PongResponse,
        query::{QueryRequest, QueryResponse},
        reject::{ERR_INVALID_TOKEN, ERR_UNSUPPORTED_MESSAGE, ErrorResponse},
    },
    server::context::ServerContext,
    transport::{RecvError, SocketError, receive_message, send_message},
    utils::now_millis,
};

/// Drive one client until it disconnects or the protocol is violated.
///
/// A session opened over this connection is torn down on exit; an active
/// transaction rolls back first.
pub async fn serve_client(
    ctx: std::sync::Arc<ServerContext>,
    stream: TcpStream,
    peer: SocketAddr,
    cancel: CancellationToken,
) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!(%peer, error = %e, "could not disable Nagle");
    }
    let io_timeout = ctx.cfg.server.timeout_connection;
    let (mut reader, mut writer) = stream.into_split();
    let mut bound_token: Option<String> = None;

    loop {
        let message = match receive_message(&mut reader, io_timeout, &cancel).await {
            Ok(message) => message,
            Err(RecvError::Wire(e)) => {
                warn!(%peer, error = %e, "protocol violation, disconnecting");
                let reply =
                    Message::from(ErrorResponse::new(e.to_string(), ERR_UNSUPPORTED_MESSAGE));
                let _ = send_message(&mut writer, &reply, io_timeout, &cancel).await;
                break;
            },
            Err(RecvError::Socket(SocketError::ConnectionClosed)) => {
                debug!(%peer, "client disconnected");
                break;
            },
            Err(RecvError::Socket(e)) => {
                warn!(%peer, error = %e, "receive failed");
                break;
            },
        };

        let reply = dispatch(&ctx, &mut bound_token, message).await;
        if let Err(e) = send_message(&mut writer, &reply, io_timeout, &cancel).await {
            warn!(%peer, error = %e, "send failed");
            break;
        }
    }

    teardown(&ctx, bound_token).await;
}

async fn dispatch(
    ctx: &ServerContext,
    bound_token: &mut Option<String>,
    message: Message,
) -> Message {
    match message {
        Message::LoginRequest(req) => handle_login(ctx, bound_token, req).await,
        Message::PingRequest(ping) => Message::from(PongResponse {
            original_timestamp_ms: ping.timestamp_ms,
            server_timestamp_ms: now_millis(),
        }),
        Message::QueryRequest(req) => handle_query(ctx, *req).await,
        other => Message::from(ErrorResponse::new(
            format!(
                "message type 0x{:02X} is not served here",
                other.message_type() as u8
            ),
            ERR_UNSUPPORTED_MESSAGE,
        )),
    }
}

async fn handle_login(
    ctx: &ServerContext,
    bound_token: &mut Option<String>,
    req: LoginRequest,
) -> Message {
    let verified = {
        let users = ctx.users.read().await;
        users.verify(&req.username, &req.password).cloned()
    };

    match verified {
        Ok(user) => {
            // one live session per user: a new login supersedes the old one
            if let Some(old) = ctx.sessions.take_by_user(&user.name) {
                debug!(user = %user.name, "superseding previous session");
                rollback_if_active(ctx, old).await;
            }
            let session = ctx.sessions.open(&user);
            *bound_token = Some(session.token.clone());
            info!(user = %user.name, "login successful");
            Message::from(LoginSuccess {
                session_token: session.token,
                user_id: user.user_id,
            })
        },
        Err(e) => {
            info!(user = %req.username, "login rejected");
            Message::from(LoginFailure::new(e.to_string()))
        },
    }
}

async fn handle_query(ctx: &ServerContext, req: QueryRequest) -> Message {
    let Some(mut session) = ctx.sessions.take(&req.session_token) else {
        return Message::from(ErrorResponse::new(
            AuthError::InvalidToken.to_string(),
            ERR_INVALID_TOKEN,
        ));
    };

    let reply = match authorize(ctx, &session, &req).await {
        Ok(()) => execute(ctx, &mut session, &req).await,
        Err(denied) => {
            info!(user = %session.user_name, error = %denied, "request denied");
            QueryResponse::failure(denied.to_string())
        },
    };

    ctx.sessions.restore(session);
    Message::from(reply)
}

async fn authorize(
    ctx: &ServerContext,
    session: &Session,
    req: &QueryRequest,
) -> Result<(), AuthError> {
    let (operation, object_type) = required_permission(req.operation);
    let object = match object_type {
        ObjectType::Database => req.db_name.as_str(),
        ObjectType::Table => req.table_name.as_str(),
        ObjectType::System => "",
    };

    let users = ctx.users.read().await;
    let user = users
        .get(&session.user_name)
        .ok_or_else(|| AuthError::UnknownUser(session.user_name.clone()))?;
    if user.can(operation, object_type, object) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied {
            operation: req.operation,
            object: object.to_owned(),
        })
    }
}

async fn execute(
    ctx: &ServerContext,
    session: &mut Session,
    req: &QueryRequest,
) -> QueryResponse {
    let mut engine = ctx.engine.lock().await;
    let condition = req.where_clause.as_ref().map(WhereClause::as_condition);
    let state = &mut session.state;

    let result = match req.operation {
        Operation::CreateDatabase => engine
            .create_database(&req.db_name)
            .map(|()| QueryResponse::empty()),
        Operation::DropDatabase => engine
            .drop_database(&req.db_name, state)
            .map(|()| QueryResponse::empty()),
        Operation::UseDatabase => engine
            .use_database(&req.db_name, state)
            .map(|()| QueryResponse::empty()),
        Operation::CreateTable => engine
            .create_table(state, &req.table_name, req.columns.clone())
            .map(|()| QueryResponse::empty()),
        Operation::DropTable => engine
            .drop_table(state, &req.table_name)
            .map(|()| QueryResponse::empty()),
        Operation::Insert => {
            let values = RowValues::Positional(
                req.insert_values.iter().map(|l| l.value.clone()).collect(),
            );
            engine
                .insert(state, &req.table_name, values)
                .map(QueryResponse::affected)
        },
        Operation::Select => engine
            .select(
                state,
                &req.table_name,
                condition.as_deref(),
                None,
                &req.select_columns,
            )
            .map(|(columns, rows)| QueryResponse::ok(columns, rows)),
        Operation::Update => {
            let assignments: Vec<(String, String)> = req
                .update_clauses
                .iter()
                .map(|c| (c.column.clone(), c.value.value.clone()))
                .collect();
            engine
                .update(state, &req.table_name, &assignments, condition.as_deref())
                .map(QueryResponse::affected)
        },
        Operation::Delete => engine
            .delete(state, &req.table_name, condition.as_deref())
            .map(QueryResponse::affected),
    };

    match result {
        Ok(reply) => reply,
        Err(e) => {
            info!(user = %session.user_name, error = %e, "query failed");
            QueryResponse::failure(e.to_string())
        },
    }
}

async fn rollback_if_active(ctx: &ServerContext, mut session: Session) {
    if session.state.txn.active {
        let mut engine = ctx.engine.lock().await;
        if let Err(e) = engine.rollback(&mut session.state) {
            warn!(user = %session.user_name, error = %e, "auto-rollback failed");
        }
    }
}

async fn teardown(ctx: &ServerContext, bound_token: Option<String>) {
    if let Some(token) = bound_token
        && let Some(session) = ctx.sessions.take(&token)
    {
        info!(user = %session.user_name, "session closed");
        rollback_if_active(ctx, session).await;
    }
}
