// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::process::ExitCode;

use anyhow::{Context, Result};
use sdsql::{
    cfg::{
        cli::{config_path_from_args, resolve_config_path},
        config::Config,
        logger::init_logger,
    },
    server::{SdsqlServer, ServerContext},
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // the logger may not be up yet, so report on stderr as well
            eprintln!("sdsql: {e:#}");
            error!(error = %format!("{e:#}"), "server exited with an error");
            ExitCode::FAILURE
        },
    }
}

async fn run() -> Result<()> {
    let cfg = match config_path_from_args(std::env::args()) {
        Some(path) => resolve_config_path(&path)
            .and_then(Config::load_from_file)
            .context("failed to resolve or load config")?,
        None => Config::default(),
    };

    let _logger_guard = init_logger(&cfg.logger)?;
    info!(
        addr = cfg.server.bind_address.as_str(),
        data_dir = cfg.storage.data_dir.as_str(),
        "starting sdsql server"
    );

    let ctx = ServerContext::init(cfg).context("failed to initialize the server context")?;
    let server = SdsqlServer::bind(ctx).context("failed to bind the listen address")?;
    let cancel = server.cancel_token();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received");
            cancel.cancel();
        }
    });

    server.run().await.context("accept loop failed")?;
    Ok(())
}
