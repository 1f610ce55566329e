// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    codec::{ByteReader, ByteWriter, CodecError},
    models::{common::MessagePayload, message_type::MessageType},
};

/// PING_REQUEST: `u64 timestamp` (milliseconds since the Unix epoch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingRequest {
    pub timestamp_ms: u64,
}

impl PingRequest {
    pub fn decode_payload(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            timestamp_ms: r.read_u64()?,
        })
    }
}

impl MessagePayload for PingRequest {
    fn message_type(&self) -> MessageType {
        MessageType::PingRequest
    }

    fn encode_payload(&self, w: &mut ByteWriter) {
        w.put_u64(self.timestamp_ms);
    }
}

/// PONG_RESPONSE: the client's timestamp echoed back plus the server's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PongResponse {
    pub original_timestamp_ms: u64,
    pub server_timestamp_ms: u64,
}

impl PongResponse {
    pub fn decode_payload(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            original_timestamp_ms: r.read_u64()?,
            server_timestamp_ms: r.read_u64()?,
        })
    }
}

impl MessagePayload for PongResponse {
    fn message_type(&self) -> MessageType {
        MessageType::PongResponse
    }

    fn encode_payload(&self, w: &mut ByteWriter) {
        w.put_u64(self.original_timestamp_ms);
        w.put_u64(self.server_timestamp_ms);
    }
}
