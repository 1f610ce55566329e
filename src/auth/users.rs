// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::PathBuf,
};

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    auth::{
        error::AuthError,
        permissions::{FULL_PERMISSIONS, ObjectType, Permission},
    },
    models::data_types::Operation,
};

/// Name of the built-in superuser.
pub const ADMIN_USER: &str = "admin";

/// User id assigned to `admin`; ordinary users count up from here.
pub const ADMIN_USER_ID: u32 = 1001;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub user_id: u32,
    pub password_hash: String,
    pub permissions: HashSet<Permission>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.name == ADMIN_USER
    }

    pub fn can(&self, operation: Operation, object_type: ObjectType, object: &str) -> bool {
        self.is_admin()
            || self
                .permissions
                .iter()
                .any(|p| p.allows(operation, object_type, object))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserFile {
    users: Vec<User>,
    next_user_id: u32,
}

/// The process-wide credential store, persisted as one JSON artifact so
/// users and their grants survive a server restart.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    users: HashMap<String, User>,
    next_user_id: u32,
}

impl UserStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let path = path.into();
        let mut store = Self {
            path,
            users: HashMap::new(),
            next_user_id: ADMIN_USER_ID + 1,
        };
        if store.path.is_file() {
            let raw = fs::read_to_string(&store.path)?;
            let file: UserFile =
                serde_json::from_str(&raw).map_err(|e| AuthError::CorruptStore(e.to_string()))?;
            store.next_user_id = file.next_user_id.max(ADMIN_USER_ID + 1);
            for user in file.users {
                store.users.insert(user.name.clone(), user);
            }
        }
        Ok(store)
    }

    /// Create `admin` with the configured default password if it is absent.
    pub fn ensure_admin(&mut self, default_password: &str) -> Result<(), AuthError> {
        if self.users.contains_key(ADMIN_USER) {
            return Ok(());
        }
        info!("creating default '{ADMIN_USER}' user");
        self.users.insert(
            ADMIN_USER.to_owned(),
            User {
                name: ADMIN_USER.to_owned(),
                user_id: ADMIN_USER_ID,
                password_hash: hash_password(default_password),
                permissions: FULL_PERMISSIONS.iter().cloned().collect(),
            },
        );
        self.persist()
    }

    /// Check credentials; the error never says whether the name or the
    /// password was wrong.
    pub fn verify(&self, name: &str, password: &str) -> Result<&User, AuthError> {
        self.users
            .get(name)
            .filter(|u| u.password_hash == hash_password(password))
            .ok_or(AuthError::InvalidCredentials)
    }

    pub fn get(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    /// Add a user with no grants; returns the assigned user id.
    pub fn create_user(&mut self, name: &str, password: &str) -> Result<u32, AuthError> {
        if name.is_empty() {
            return Err(AuthError::EmptyUserName);
        }
        if self.users.contains_key(name) {
            return Err(AuthError::DuplicateUser(name.to_owned()));
        }
        let user_id = self.next_user_id;
        self.next_user_id += 1;
        self.users.insert(
            name.to_owned(),
            User {
                name: name.to_owned(),
                user_id,
                password_hash: hash_password(password),
                permissions: HashSet::new(),
            },
        );
        self.persist()?;
        Ok(user_id)
    }

    pub fn drop_user(&mut self, name: &str) -> Result<(), AuthError> {
        if name == ADMIN_USER {
            return Err(AuthError::CannotDropAdmin);
        }
        self.users
            .remove(name)
            .ok_or_else(|| AuthError::UnknownUser(name.to_owned()))?;
        self.persist()
    }

    pub fn grant(&mut self, name: &str, permission: Permission) -> Result<(), AuthError> {
        let user = self
            .users
            .get_mut(name)
            .ok_or_else(|| AuthError::UnknownUser(name.to_owned()))?;
        user.permissions.insert(permission);
        self.persist()
    }

    pub fn revoke(&mut self, name: &str, permission: &Permission) -> Result<(), AuthError> {
        let user = self
            .users
            .get_mut(name)
            .ok_or_else(|| AuthError::UnknownUser(name.to_owned()))?;
        user.permissions.remove(permission);
        self.persist()
    }

    fn persist(&self) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut users: Vec<&User> = self.users.values().collect();
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        let file = UserFile {
            users: users.into_iter().cloned().collect(),
            next_user_id: self.next_user_id,
        };
        let raw = serde_json::to_string_pretty(&file)
            .map_err(|e| AuthError::CorruptStore(e.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Hex MD5 digest of a password. The store never holds plaintext.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
