//! Test utilities for detectors
//!
//! Serves a mock network API from an axum `Router` on an ephemeral port,
//! so detectors can be pointed at it through their `base_url`.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::HttpConfig;
use crate::http::HttpClient;

/// A mock network server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    http: HttpClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Start serving `router`
    ///
    /// # Example
    ///
    /// ```ignore
    /// use evmap_detectors::testing::TestServer;
    ///
    /// let server = TestServer::start(mock_newmotion_router()).await?;
    /// let detector = NewMotionDetector::new(server.http().clone(), &server.base_url());
    /// ```
    pub async fn start(router: axum::Router) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let config = HttpConfig {
            timeout_secs: 5,
            connect_timeout_secs: 2,
            ..HttpConfig::default()
        };
        let http = HttpClient::new(&config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

        Ok(Self {
            addr,
            http,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// HTTP client configured with short test timeouts
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
