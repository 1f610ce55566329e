// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::io;

use thiserror::Error;

use crate::models::data_types::Operation;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Deliberately does not distinguish an unknown name from a wrong
    /// password.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("unknown user '{0}'")]
    UnknownUser(String),

    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    #[error("user name must not be empty")]
    EmptyUserName,

    #[error("the built-in admin user cannot be dropped")]
    CannotDropAdmin,

    #[error("permission denied: {operation} on '{object}'")]
    PermissionDenied { operation: Operation, object: String },

    #[error("invalid or expired session token")]
    InvalidToken,

    #[error("user store is corrupt: {0}")]
    CorruptStore(String),

    #[error("user store I/O failed: {0}")]
    Io(#[from] io::Error),
}
