// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

/// Longest string payload accepted from the wire: 1 MiB of raw bytes.
pub const MAX_STRING_LEN: usize = 1024 * 1024;

/// Errors produced while reading primitives out of a wire buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("write past the end of a bounded buffer")]
    BufferOverflow,

    #[error("need {needed} more byte(s) but only {remaining} left")]
    InsufficientData { needed: usize, remaining: usize },

    #[error("malformed {0} field")]
    InvalidFormat(&'static str),

    #[error("declared string length {0} exceeds the 1 MiB wire limit")]
    StringTooLong(usize),
}
