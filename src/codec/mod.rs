// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Length-prefixed wire serialization: big-endian primitives, `u32`-prefixed
//! strings, and a bounds-checked read cursor.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{CodecError, MAX_STRING_LEN};
pub use reader::ByteReader;
pub use writer::ByteWriter;
