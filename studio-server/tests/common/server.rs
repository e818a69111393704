//! Test server harness for integration tests.
//!
//! Spins up the real API router on a random port so tests can talk to it
//! with an HTTP client.

use std::net::SocketAddr;
use std::time::Duration;

use studio_core::{Catalog, HistoryConfig, HistoryStore, MemoryHistoryStore, StudioState};
use studio_server::{AppState, GeneratorClient};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A test server instance with control handles.
pub struct TestServer {
    addr: SocketAddr,
    state: AppState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with an in-memory store and no generator.
    #[allow(dead_code)]
    pub async fn start() -> Self {
        Self::start_with(Box::new(MemoryHistoryStore::new()), None).await
    }

    /// Start a server whose generator lives at `ai_url`.
    #[allow(dead_code)]
    pub async fn with_generator(ai_url: &str) -> Self {
        let generator =
            GeneratorClient::new(ai_url, Duration::from_secs(5)).expect("generator client");
        Self::start_with(Box::new(MemoryHistoryStore::new()), Some(generator)).await
    }

    /// Start a server on top of `store`.
    ///
    /// # Panics
    ///
    /// Panics if no port is available or the server fails to bind.
    pub async fn start_with(
        store: Box<dyn HistoryStore>,
        generator: Option<GeneratorClient>,
    ) -> Self {
        let port = portpicker::pick_unused_port().expect("no available port");
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        let studio = StudioState::with_store(Catalog::builtin(), HistoryConfig::default(), store);
        let state = AppState::new(studio, generator);
        let app = studio_server::router(state.clone());

        let listener = TcpListener::bind(addr).await.expect("failed to bind");
        let actual_addr = listener.local_addr().expect("failed to get local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("server error");
        });

        // Give the server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        Self {
            addr: actual_addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    /// URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Shared state (for test assertions).
    #[allow(dead_code)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Gracefully shut down the server.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}
