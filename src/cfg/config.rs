// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, net::SocketAddr, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::cfg::logger::LoggerConfig;

/// Default listen address of the server.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:4399";

/// Default password of the built-in `admin` user. Operators are expected to
/// change it.
pub const DEFAULT_ADMIN_PASSWORD: &str = "123456";

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Listener and per-connection I/O settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential store settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Where persisted databases and the user store live.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Log level and destination.
    #[serde(default)]
    pub logger: LoggerConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(rename = "BindAddress", default = "default_bind_address")]
    pub bind_address: String,

    /// Listen backlog passed to the socket.
    #[serde(rename = "Backlog", default = "default_backlog")]
    pub backlog: u32,

    /// Per-connection I/O timeout in seconds.
    #[serde(rename = "TimeoutConnection", default = "default_timeout", with = "serde_secs")]
    pub timeout_connection: Duration,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuthConfig {
    /// Password given to `admin` the first time the store is created.
    #[serde(rename = "AdminPassword", default = "default_admin_password")]
    pub admin_password: String,

    /// File name of the user store, relative to the data directory.
    #[serde(rename = "UsersFile", default = "default_users_file")]
    pub users_file: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StorageConfig {
    #[serde(rename = "DataDir", default = "default_data_dir")]
    pub data_dir: String,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_owned()
}

fn default_backlog() -> u32 {
    10
}

fn default_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_owned()
}

fn default_users_file() -> String {
    "users.json".to_owned()
}

fn default_data_dir() -> String {
    "./sdsql_data".to_owned()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            backlog: default_backlog(),
            timeout_connection: default_timeout(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_password: default_admin_password(),
            users_file: default_users_file(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            logger: LoggerConfig::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.server
            .bind_address
            .parse::<SocketAddr>()
            .with_context(|| {
                format!("BindAddress '{}' is not host:port", self.server.bind_address)
            })?;
        ensure!(self.server.backlog >= 1, "Backlog must be >= 1");
        ensure!(
            self.server.timeout_connection >= Duration::from_secs(1),
            "TimeoutConnection must be >= 1 second"
        );
        ensure!(!self.storage.data_dir.is_empty(), "DataDir must not be empty");
        ensure!(
            !self.auth.users_file.is_empty(),
            "UsersFile must not be empty"
        );
        Ok(())
    }
}

/// Serde helpers for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
