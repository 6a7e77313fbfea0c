//! API server lifecycle: bind, spawn `axum::serve` in the background and
//! hand back a handle that can stop it.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::core_state::CoreState;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind API server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

/// Handle to a running API server.
pub struct ApiServer {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl ApiServer {
    /// Address actually bound (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Ask the server to stop accepting connections. Safe to call twice.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Shut down and wait for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Err(e) = self.task.await {
            tracing::error!("API server task failed: {e}");
        }
    }
}

/// Start the API server on `addr`.
///
/// Binding happens before this returns, so a port clash surfaces as an
/// error here rather than inside the background task.
pub async fn start_server_on(
    core: Arc<CoreState>,
    addr: SocketAddr,
    cors_origins: &[String],
) -> Result<ApiServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let app = api_router(core, cors_origins);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(addr = %local_addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        local_addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn loopback() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    fn test_core() -> (Arc<CoreState>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let core = CoreState::new(tmp.path().join("checkin.db"));
        (Arc::new(core), tmp)
    }

    #[tokio::test]
    async fn serves_health_over_http() {
        let (core, _tmp) = test_core();
        let server = start_server_on(core, loopback(), &[])
            .await
            .expect("server should start");
        assert!(server.local_addr().port() > 0);

        let url = format!("http://{}/api/health", server.local_addr());
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["database"], "ok");

        server.stop().await;
    }

    #[tokio::test]
    async fn creates_and_lists_over_http() {
        let (core, _tmp) = test_core();
        let server = start_server_on(core, loopback(), &[]).await.unwrap();
        let base = format!("http://{}/api", server.local_addr());
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{base}/empresas"))
            .json(&serde_json::json!({ "nome": "Acme" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

        let companies: serde_json::Value = client
            .get(format!("{base}/empresas"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(companies[0]["nome"], "Acme");

        drop(client);
        server.stop().await;
    }

    #[tokio::test]
    async fn port_in_use_is_reported() {
        let (core, _tmp) = test_core();
        let first = start_server_on(core.clone(), loopback(), &[]).await.unwrap();
        let err = start_server_on(core, first.local_addr(), &[])
            .await
            .err()
            .expect("second bind should fail");
        assert!(matches!(err, ServerError::Bind { .. }));
        first.stop().await;
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let (core, _tmp) = test_core();
        let mut server = start_server_on(core, loopback(), &[]).await.unwrap();
        server.shutdown();
        server.shutdown();
        server.stop().await;
    }
}
