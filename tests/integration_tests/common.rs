use std::{path::PathBuf, sync::Arc, time::Duration};

use sdsql::{
    cfg::Config,
    client::{ClientConnection, SdsqlClient},
    server::{SdsqlServer, ServerContext},
    utils::generate_session_token,
};
use tokio_util::sync::CancellationToken;

pub const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// A server on an ephemeral port with its own scratch data directory.
pub struct TestServer {
    pub addr: String,
    pub ctx: Arc<ServerContext>,
    cancel: CancellationToken,
    data_dir: PathBuf,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let data_dir =
            std::env::temp_dir().join(format!("sdsql_it_{}", generate_session_token()));

        let mut cfg = Config::default();
        cfg.server.bind_address = "127.0.0.1:0".to_owned();
        cfg.server.timeout_connection = IO_TIMEOUT;
        cfg.storage.data_dir = data_dir.display().to_string();

        let ctx = ServerContext::init(cfg).expect("server context");
        let server = SdsqlServer::bind(Arc::clone(&ctx)).expect("bind ephemeral port");
        let addr = server.local_addr().expect("local addr").to_string();
        let cancel = server.cancel_token();

        tokio::spawn(async move {
            let _ = server.run().await;
        });

        Self {
            addr,
            ctx,
            cancel,
            data_dir,
        }
    }

    pub async fn client(&self) -> SdsqlClient {
        let conn = ClientConnection::connect(&self.addr, IO_TIMEOUT)
            .await
            .expect("connect");
        SdsqlClient::new(conn)
    }

    pub async fn admin_client(&self) -> SdsqlClient {
        let mut client = self.client().await;
        let user_id = client.login("admin", "123456").await.expect("admin login");
        assert_eq!(user_id, 1001);
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.cancel.cancel();
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}
