// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use tokio::sync::{Mutex, RwLock};

use crate::{
    auth::{SessionManager, UserStore},
    cfg::Config,
    engine::Engine,
    storage::FileBackend,
};

/// Everything a connection handler needs: the engine behind its single
/// mutex, the user store, and the live-session registry.
///
/// Session state itself is never inside this struct; handlers check a
/// session out of `sessions`, work on it, and put it back.
pub struct ServerContext {
    pub cfg: Config,
    pub engine: Mutex<Engine>,
    pub users: RwLock<UserStore>,
    pub sessions: SessionManager,
}

impl ServerContext {
    /// Open storage, load the user store (creating `admin` if needed) and
    /// assemble the shared context.
    pub fn init(cfg: Config) -> Result<Arc<Self>> {
        let backend = FileBackend::open(cfg.storage.data_dir.as_str())
            .with_context(|| format!("cannot open data dir '{}'", cfg.storage.data_dir))?;
        let engine = Engine::new(Box::new(backend));

        let users_path = Path::new(&cfg.storage.data_dir).join(&cfg.auth.users_file);
        let mut users = UserStore::open(users_path).context("cannot open the user store")?;
        users
            .ensure_admin(&cfg.auth.admin_password)
            .context("cannot create the default admin user")?;

        Ok(Arc::new(Self {
            cfg,
            engine: Mutex::new(engine),
            users: RwLock::new(users),
            sessions: SessionManager::new(),
        }))
    }
}
