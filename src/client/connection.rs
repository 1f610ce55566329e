// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use tokio::net::{
    TcpStream,
    tcp::{OwnedReadHalf, OwnedWriteHalf},
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    models::parse::Message,
    transport::{RecvError, SocketError, receive_message, send_message},
};

/// One TCP connection to the server.
///
/// The protocol is strict request/response, so `call` is the whole client
/// transport: write one frame, read one frame.
#[derive(Debug)]
pub struct ClientConnection {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    io_timeout: Duration,
    cancel: CancellationToken,
}

impl ClientConnection {
    /// Establishes a new TCP connection to the given address.
    pub async fn connect(addr: &str, io_timeout: Duration) -> Result<Self, SocketError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(SocketError::SocketCreateFailed)?;
        stream.set_nodelay(true).map_err(SocketError::SocketCreateFailed)?;

        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            io_timeout,
            cancel: CancellationToken::new(),
        })
    }

    /// Abort any in-flight I/O on this connection.
    pub fn cancel_now(&self) {
        self.cancel.cancel();
    }

    pub async fn send(&self, message: &Message) -> Result<(), SocketError> {
        debug!(?message, "SEND");
        let mut writer = self.writer.lock().await;
        send_message(&mut *writer, message, self.io_timeout, &self.cancel).await
    }

    pub async fn receive(&self) -> Result<Message, RecvError> {
        let mut reader = self.reader.lock().await;
        let message = receive_message(&mut *reader, self.io_timeout, &self.cancel).await?;
        debug!(?message, "RECV");
        Ok(message)
    }

    /// One request/response round trip.
    pub async fn call(&self, message: &Message) -> Result<Message, RecvError> {
        self.send(message).await?;
        self.receive().await
    }
}
