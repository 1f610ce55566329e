// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{net::SocketAddr, sync::Arc};

use tokio::net::{TcpListener, TcpSocket};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    server::{context::ServerContext, handler::serve_client},
    transport::SocketError,
};

/// The accept loop. Each accepted client runs on its own task; all of them
/// share the context and stop when the server's cancel token fires.
pub struct SdsqlServer {
    listener: TcpListener,
    ctx: Arc<ServerContext>,
    cancel: CancellationToken,
}

impl SdsqlServer {
    /// Bind the configured address with address-reuse and the configured
    /// backlog.
    pub fn bind(ctx: Arc<ServerContext>) -> Result<Self, SocketError> {
        let addr: SocketAddr = ctx
            .cfg
            .server
            .bind_address
            .parse()
            .map_err(|_| SocketError::InvalidAddress(ctx.cfg.server.bind_address.clone()))?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(SocketError::SocketCreateFailed)?;
        socket
            .set_reuseaddr(true)
            .map_err(SocketError::SocketCreateFailed)?;
        socket.bind(addr).map_err(SocketError::BindFailed)?;

        let listener = socket
            .listen(ctx.cfg.server.backlog)
            .map_err(SocketError::ListenFailed)?;

        Ok(Self {
            listener,
            ctx,
            cancel: CancellationToken::new(),
        })
    }

    /// The actual bound address; useful when the config asked for port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, SocketError> {
        self.listener.local_addr().map_err(SocketError::SocketCreateFailed)
    }

    /// Token that stops the accept loop and every connection task.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Accept clients forever, until the cancel token fires.
    pub async fn run(self) -> Result<(), SocketError> {
        match self.local_addr() {
            Ok(addr) => info!(%addr, "server listening"),
            Err(_) => info!("server listening"),
        }

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("server shutting down");
                    return Ok(());
                },
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        info!(%peer, "client connected");
                        let ctx = Arc::clone(&self.ctx);
                        let cancel = self.cancel.child_token();
                        tokio::spawn(async move {
                            serve_client(ctx, stream, peer, cancel).await;
                        });
                    },
                    Err(e) => {
                        // transient accept failures must not kill the server
                        warn!(error = %SocketError::AcceptFailed(e), "accept failed");
                    },
                },
            }
        }
    }
}
