// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Framed message exchange over a TCP stream: exact-length reads of the
//! 9-byte header plus the declared payload, exact-length writes of encoded
//! frames, everything raced against a timeout and a cancellation token.

pub mod error;

use std::{io, time::Duration};

use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    time::timeout,
};
use tokio_util::sync::CancellationToken;

use crate::models::{
    common::{FrameHeader, HEADER_LEN, WireError},
    parse::Message,
};
pub use error::{RecvError, SocketError};

/// Upper bound on a declared payload, far above anything a legal message
/// produces. Protects the receive path from allocating on garbage lengths
/// that happen to carry a valid magic.
pub const MAX_PAYLOAD_LEN: usize = 16 * 1024 * 1024;

pub(crate) async fn io_with_timeout<F, T>(
    label: &'static str,
    fut: F,
    io_timeout: Duration,
    cancel: &CancellationToken,
) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(io::Error::new(
            io::ErrorKind::Interrupted,
            format!("{label} cancelled"),
        )),
        res = timeout(io_timeout, fut) => match res {
            Ok(r) => r,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("{label} timeout"),
            )),
        },
    }
}

fn map_recv(e: io::Error) -> SocketError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        SocketError::ConnectionClosed
    } else {
        SocketError::RecvFailed(e)
    }
}

/// Encode `message` and write the whole frame.
pub async fn send_message<W>(
    writer: &mut W,
    message: &Message,
    io_timeout: Duration,
    cancel: &CancellationToken,
) -> Result<(), SocketError>
where
    W: AsyncWrite + Unpin,
{
    let frame = message.encode();
    io_with_timeout("write frame", writer.write_all(&frame), io_timeout, cancel)
        .await
        .map_err(SocketError::SendFailed)?;
    Ok(())
}

/// Read exactly one message: 9 header bytes, magic/type validation, then
/// exactly `payload_size` payload bytes, then the typed payload decoder.
///
/// The payload is not read when the header already failed validation, so a
/// garbage frame cannot make the server wait on a bogus length.
pub async fn receive_message<R>(
    reader: &mut R,
    io_timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Message, RecvError>
where
    R: AsyncRead + Unpin,
{
    let mut header_buf = [0u8; HEADER_LEN];
    io_with_timeout(
        "read header",
        reader.read_exact(&mut header_buf),
        io_timeout,
        cancel,
    )
    .await
    .map_err(map_recv)?;

    let header = FrameHeader::read_from(&header_buf)?;
    let message_type = header.validate()?;

    let payload_len = header.payload_size.get() as usize;
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(WireError::PayloadSizeMismatch {
            declared: payload_len,
            actual: 0,
        }
        .into());
    }

    let mut payload = vec![0u8; payload_len];
    if payload_len > 0 {
        io_with_timeout(
            "read payload",
            reader.read_exact(&mut payload),
            io_timeout,
            cancel,
        )
        .await
        .map_err(map_recv)?;
    }

    Ok(Message::decode_payload(message_type, &payload)?)
}
