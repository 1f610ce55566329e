// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt::Write;

use chrono::Utc;
use rand::RngExt;

/// Generates a fresh session token: 16 random bytes, hex-encoded.
///
/// Tokens are opaque to clients and never derived from a counter, so one
/// token gives no purchase on guessing the next.
pub fn generate_session_token() -> String {
    let mut raw = [0u8; 16];
    rand::rng().fill(&mut raw);

    let mut token = String::with_capacity(32);
    for byte in &raw {
        write!(&mut token, "{byte:02x}").expect("Writing to String cannot fail");
    }

    token
}

/// Milliseconds since the Unix epoch, as carried by PING/PONG.
pub fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
