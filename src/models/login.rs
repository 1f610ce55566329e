// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Login exchange: LOGIN_REQUEST and its two possible answers.

use crate::{
    codec::{ByteReader, ByteWriter, CodecError},
    models::{common::MessagePayload, message_type::MessageType},
};

/// Credentials presented by a client: `string username, string password`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn decode_payload(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            username: r.read_string()?,
            password: r.read_string()?,
        })
    }
}

impl MessagePayload for LoginRequest {
    fn message_type(&self) -> MessageType {
        MessageType::LoginRequest
    }

    fn encode_payload(&self, w: &mut ByteWriter) {
        w.put_string(&self.username);
        w.put_string(&self.password);
    }
}

/// Successful login: `string session_token, u32 user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub session_token: String,
    pub user_id: u32,
}

impl LoginSuccess {
    pub fn decode_payload(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            session_token: r.read_string()?,
            user_id: r.read_u32()?,
        })
    }
}

impl MessagePayload for LoginSuccess {
    fn message_type(&self) -> MessageType {
        MessageType::LoginSuccess
    }

    fn encode_payload(&self, w: &mut ByteWriter) {
        w.put_string(&self.session_token);
        w.put_u32(self.user_id);
    }
}

/// Rejected login. The message stays generic so user names cannot be probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginFailure {
    pub error_message: String,
}

impl LoginFailure {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
        }
    }

    pub fn decode_payload(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            error_message: r.read_string()?,
        })
    }
}

impl MessagePayload for LoginFailure {
    fn message_type(&self) -> MessageType {
        MessageType::LoginFailure
    }

    fn encode_payload(&self, w: &mut ByteWriter) {
        w.put_string(&self.error_message);
    }
}
