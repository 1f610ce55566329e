// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    codec::{ByteReader, ByteWriter, CodecError},
    models::{common::MessagePayload, message_type::MessageType},
};

/// Code sent when a request carries a token that was never issued or has
/// been invalidated.
pub const ERR_INVALID_TOKEN: u32 = 401;

/// Code sent for a well-framed message the server does not serve.
pub const ERR_UNSUPPORTED_MESSAGE: u32 = 400;

/// ERROR_RESPONSE: `string error_message, u32 error_code`.
///
/// Used for protocol-level rejections (bad frames, unknown tokens), as
/// opposed to [`super::query::QueryResponse`] failures which report contract
/// errors inside an otherwise healthy session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error_message: String,
    pub error_code: u32,
}

impl ErrorResponse {
    pub fn new(error_message: impl Into<String>, error_code: u32) -> Self {
        Self {
            error_message: error_message.into(),
            error_code,
        }
    }

    pub fn decode_payload(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            error_message: r.read_string()?,
            error_code: r.read_u32()?,
        })
    }
}

impl MessagePayload for ErrorResponse {
    fn message_type(&self) -> MessageType {
        MessageType::ErrorResponse
    }

    fn encode_payload(&self, w: &mut ByteWriter) {
        w.put_string(&self.error_message);
        w.put_u32(self.error_code);
    }
}
