// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use dashmap::DashMap;

use crate::{auth::users::User, engine::SessionState, utils::generate_session_token};

/// One authenticated session, created by a successful LOGIN and destroyed on
/// disconnect, logout or supersession by a newer login of the same user.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_name: String,
    pub user_id: u32,
    pub state: SessionState,
}

/// Live sessions keyed by token.
///
/// Connection tasks take a session out of the map while they work on it and
/// put it back afterwards, so each session is only ever touched by one task.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: DashMap<String, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a session for `user` with a fresh token.
    pub fn open(&self, user: &User) -> Session {
        let session = Session {
            token: generate_session_token(),
            user_name: user.name.clone(),
            user_id: user.user_id,
            state: SessionState::default(),
        };
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Remove and return the session for `token`, if one is live.
    pub fn take(&self, token: &str) -> Option<Session> {
        self.sessions.remove(token).map(|(_, session)| session)
    }

    /// Put a taken session back.
    pub fn restore(&self, session: Session) {
        self.sessions.insert(session.token.clone(), session);
    }

    /// Remove any live session belonging to `user_name`. Used to supersede
    /// an older login; the caller still owns rolling back its transaction.
    pub fn take_by_user(&self, user_name: &str) -> Option<Session> {
        let token = self
            .sessions
            .iter()
            .find(|entry| entry.value().user_name == user_name)
            .map(|entry| entry.key().clone())?;
        self.take(&token)
    }

    pub fn is_live(&self, token: &str) -> bool {
        self.sessions.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
