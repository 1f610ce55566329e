// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::io;

use thiserror::Error;

use crate::models::common::WireError;

/// Socket-level failures. `ConnectionClosed` is the normal way a client
/// departure is observed: a zero-length read mid-frame.
#[derive(Debug, Error)]
pub enum SocketError {
    #[error("failed to create socket: {0}")]
    SocketCreateFailed(#[source] io::Error),

    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("failed to bind: {0}")]
    BindFailed(#[source] io::Error),

    #[error("failed to listen: {0}")]
    ListenFailed(#[source] io::Error),

    #[error("failed to accept client: {0}")]
    AcceptFailed(#[source] io::Error),

    #[error("send failed: {0}")]
    SendFailed(#[source] io::Error),

    #[error("receive failed: {0}")]
    RecvFailed(#[source] io::Error),

    #[error("connection closed by peer")]
    ConnectionClosed,
}

/// What can go wrong while receiving one message. The two arms carry
/// different propagation policies: socket errors end the session silently,
/// wire errors are answered with an ERROR_RESPONSE before disconnecting.
#[derive(Debug, Error)]
pub enum RecvError {
    #[error(transparent)]
    Socket(#[from] SocketError),

    #[error(transparent)]
    Wire(#[from] WireError),
}
