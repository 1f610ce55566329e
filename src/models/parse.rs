// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use bytes::{Bytes, BytesMut};
use enum_dispatch::enum_dispatch;
use zerocopy::IntoBytes;

use crate::{
    codec::{ByteReader, ByteWriter},
    models::{
        common::{FrameHeader, HEADER_LEN, MessagePayload, WireError},
        login::{LoginFailure, LoginRequest, LoginSuccess},
        message_type::MessageType,
        ping::{PingRequest, PongResponse},
        query::{QueryRequest, QueryResponse},
        reject::ErrorResponse,
    },
};

/// Every message the protocol speaks, tagged by its type byte.
///
/// Encoding is dispatched through [`MessagePayload`]; decoding goes through
/// the [`Message::decode_payload`] factory keyed on the header's type byte.
#[enum_dispatch(MessagePayload)]
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    LoginRequest(LoginRequest),
    LoginSuccess(LoginSuccess),
    LoginFailure(LoginFailure),
    /// Boxed: the request record is an order of magnitude wider than any
    /// other variant.
    QueryRequest(Box<QueryRequest>),
    QueryResponse(QueryResponse),
    PingRequest(PingRequest),
    PongResponse(PongResponse),
    ErrorResponse(ErrorResponse),
}

impl From<QueryRequest> for Message {
    fn from(request: QueryRequest) -> Self {
        Message::QueryRequest(Box::new(request))
    }
}

impl Message {
    /// Serialize to a ready-to-send frame. The payload is built first so the
    /// header carries its exact size.
    pub fn encode(&self) -> Bytes {
        let mut payload = ByteWriter::with_capacity(64);
        self.encode_payload(&mut payload);

        let header = FrameHeader::new(self.message_type(), payload.len() as u32);

        let mut frame = BytesMut::with_capacity(HEADER_LEN + payload.len());
        frame.extend_from_slice(header.as_bytes());
        frame.extend_from_slice(payload.as_slice());
        frame.freeze()
    }

    /// Parse a complete frame: header, magic, type, then the typed payload.
    pub fn decode(frame: &[u8]) -> Result<Self, WireError> {
        let header = FrameHeader::read_from(frame)?;
        let message_type = header.validate()?;

        let declared = header.payload_size.get() as usize;
        let payload = &frame[HEADER_LEN..];
        if payload.len() != declared {
            return Err(WireError::PayloadSizeMismatch {
                declared,
                actual: payload.len(),
            });
        }

        Self::decode_payload(message_type, payload)
    }

    /// Run the payload decoder selected by `message_type`. Trailing bytes
    /// after a successful decode are a framing error.
    pub fn decode_payload(
        message_type: MessageType,
        payload: &[u8],
    ) -> Result<Self, WireError> {
        let mut r = ByteReader::new(payload);
        let message: Message = match message_type {
            MessageType::LoginRequest => LoginRequest::decode_payload(&mut r)?.into(),
            MessageType::LoginSuccess => LoginSuccess::decode_payload(&mut r)?.into(),
            MessageType::LoginFailure => LoginFailure::decode_payload(&mut r)?.into(),
            MessageType::QueryRequest => {
                Box::new(QueryRequest::decode_payload(&mut r)?).into()
            },
            MessageType::QueryResponse => QueryResponse::decode_payload(&mut r)?.into(),
            MessageType::PingRequest => PingRequest::decode_payload(&mut r)?.into(),
            MessageType::PongResponse => PongResponse::decode_payload(&mut r)?.into(),
            MessageType::ErrorResponse => ErrorResponse::decode_payload(&mut r)?.into(),
        };

        if !r.is_empty() {
            return Err(WireError::PayloadSizeMismatch {
                declared: payload.len(),
                actual: r.position(),
            });
        }

        Ok(message)
    }
}
