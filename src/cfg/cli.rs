// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable consulted when no config path is given on the
/// command line.
pub const CONFIG_ENV: &str = "SDSQL_CONFIG";

/// Pick the config path: first CLI argument, then `SDSQL_CONFIG`, else none
/// (the caller falls back to built-in defaults).
pub fn config_path_from_args<I: IntoIterator<Item = String>>(args: I) -> Option<String> {
    args.into_iter()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
}

pub fn resolve_config_path(rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);

    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };

    let canon = abs
        .canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))?;

    Ok(canon)
}
