// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Identity and authorization: the persisted user store, permission
//! records, and the live-session registry.

pub mod error;
pub mod permissions;
pub mod sessions;
pub mod users;

pub use error::AuthError;
pub use permissions::{ObjectType, Permission, required_permission};
pub use sessions::{Session, SessionManager};
pub use users::{ADMIN_USER, ADMIN_USER_ID, User, UserStore, hash_password};
