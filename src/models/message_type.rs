// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The one-byte message discriminator carried in every frame header.

use std::convert::TryFrom;

use thiserror::Error;

/// All message types understood by the protocol.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    LoginRequest = 0x10,
    LoginSuccess = 0x11,
    LoginFailure = 0x12,
    QueryRequest = 0x20,
    QueryResponse = 0x21,
    PingRequest = 0x30,
    PongResponse = 0x31,
    ErrorResponse = 0x99,
}

impl MessageType {
    #[inline]
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0x10 => Self::LoginRequest,
            0x11 => Self::LoginSuccess,
            0x12 => Self::LoginFailure,
            0x20 => Self::QueryRequest,
            0x21 => Self::QueryResponse,
            0x30 => Self::PingRequest,
            0x31 => Self::PongResponse,
            0x99 => Self::ErrorResponse,
            _ => return None,
        })
    }
}

/// Returned when the type byte names no known message.
#[derive(Debug, Error)]
#[error("invalid message type: 0x{0:02x}")]
pub struct UnknownMessageType(pub u8);

impl TryFrom<u8> for MessageType {
    type Error = UnknownMessageType;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_u8(byte).ok_or(UnknownMessageType(byte))
    }
}
