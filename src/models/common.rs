// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use enum_dispatch::enum_dispatch;
use thiserror::Error;
use zerocopy::{
    BigEndian, FromBytes as ZFromBytes, Immutable, IntoBytes, KnownLayout, U32,
    Unaligned,
};

use crate::{
    codec::{ByteWriter, CodecError},
    models::message_type::MessageType,
};

/// Fixed sentinel at the start of every framed message.
pub const MAGIC: u32 = 0xDEAD_BEEF;

/// Header size on the wire: magic (4) + type (1) + payload size (4).
pub const HEADER_LEN: usize = 9;

/// The 9-byte frame header, laid out exactly as it travels.
///
/// All multi-byte fields are big-endian; the struct is unaligned so it can be
/// read straight off a receive buffer.
#[repr(C)]
#[derive(
    Debug, Clone, PartialEq, Eq, ZFromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct FrameHeader {
    pub magic: U32<BigEndian>,
    pub message_type: u8,
    pub payload_size: U32<BigEndian>,
}

impl FrameHeader {
    pub fn new(message_type: MessageType, payload_size: u32) -> Self {
        Self {
            magic: MAGIC.into(),
            message_type: message_type as u8,
            payload_size: payload_size.into(),
        }
    }

    /// Parse a received header out of the first [`HEADER_LEN`] bytes.
    pub fn read_from(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() < HEADER_LEN {
            return Err(CodecError::InsufficientData {
                needed: HEADER_LEN,
                remaining: buf.len(),
            }
            .into());
        }
        Self::read_from_bytes(&buf[..HEADER_LEN]).map_err(|_| {
            WireError::DeserializationFailed(CodecError::InvalidFormat("header"))
        })
    }

    /// Check the magic and map the type byte to a known variant.
    pub fn validate(&self) -> Result<MessageType, WireError> {
        if self.magic.get() != MAGIC {
            return Err(WireError::InvalidMagicNumber(self.magic.get()));
        }
        MessageType::from_u8(self.message_type)
            .ok_or(WireError::InvalidMessageType(self.message_type))
    }
}

/// Framing-level failures on received bytes.
///
/// Per the propagation policy these are answered with an ERROR_RESPONSE and
/// the connection is closed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("invalid magic number 0x{0:08X}")]
    InvalidMagicNumber(u32),

    #[error("invalid message type 0x{0:02X}")]
    InvalidMessageType(u8),

    #[error("payload size mismatch: header declares {declared} byte(s), got {actual}")]
    PayloadSizeMismatch { declared: usize, actual: usize },

    #[error("failed to decode payload: {0}")]
    DeserializationFailed(#[from] CodecError),
}

/// Behaviour shared by every message variant: its wire discriminator and the
/// payload encoder. Decoding stays per-variant and is dispatched by the
/// factory in [`crate::models::parse`].
#[enum_dispatch]
pub trait MessagePayload {
    fn message_type(&self) -> MessageType;

    fn encode_payload(&self, w: &mut ByteWriter);
}
