//! Common test utilities and helpers.

#![allow(dead_code)]

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chat_relay_server::{
    config::{Config, LoggingConfig, ServerConfig, StorageConfig, WebhookConfig},
    create_router, AppState,
};
use serde_json::Value;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener as TokioTcpListener;

/// Test server instance
pub struct TestServer {
    pub public_url: String,
    pub data_dir: TempDir,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a test server without a webhook URL
    pub async fn start() -> Self {
        Self::start_with_webhook(None).await
    }

    /// Start a test server relaying chat to `webhook_url`
    pub async fn start_with_webhook(webhook_url: Option<String>) -> Self {
        let port = get_available_port();
        let data_dir = TempDir::new().expect("Failed to create temp dir");
        let public_url = format!("http://127.0.0.1:{}", port);

        let config = create_test_config(&data_dir, port, webhook_url);
        let state = AppState::new(&config).expect("Failed to create app state");
        let app = create_router(state);

        let listener = TokioTcpListener::bind(("127.0.0.1", port))
            .await
            .expect("Failed to bind listener");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            tokio::select! {
                _ = axum::serve(listener, app) => {}
                _ = shutdown_rx => {}
            }
        });

        // Give server time to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            public_url,
            data_dir,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get HTTP client
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap()
    }

    /// Get public URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.public_url, path)
    }

    /// Directory uploads are written to
    pub fn upload_dir(&self) -> PathBuf {
        self.data_dir.path().join("uploads")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Stand-in for the automation webhook
///
/// Answers every POST with a fixed status and body and records the JSON
/// payloads it receives.
pub struct MockWebhook {
    pub url: String,
    received: Arc<Mutex<Vec<Value>>>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: &'static str,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn mock_hook(State(state): State<MockState>, Json(payload): Json<Value>) -> (StatusCode, &'static str) {
    state.received.lock().unwrap().push(payload);
    (state.status, state.reply)
}

impl MockWebhook {
    /// Start a webhook that answers 200 with `reply`
    pub async fn replying(reply: &'static str) -> Self {
        Self::start(StatusCode::OK, reply).await
    }

    /// Start a webhook answering with the given status and body
    pub async fn start(status: StatusCode, reply: &'static str) -> Self {
        let port = get_available_port();
        let received = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route("/webhook/chat", post(mock_hook))
            .with_state(MockState {
                status,
                reply,
                received: received.clone(),
            });

        let listener = TokioTcpListener::bind(("127.0.0.1", port))
            .await
            .expect("Failed to bind mock webhook");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            tokio::select! {
                _ = axum::serve(listener, app) => {}
                _ = shutdown_rx => {}
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            url: format!("http://127.0.0.1:{}/webhook/chat", port),
            received,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Payloads received so far
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for MockWebhook {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Create test configuration
fn create_test_config(data_dir: &TempDir, port: u16, webhook_url: Option<String>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
        },
        webhook: WebhookConfig { url: webhook_url },
        storage: StorageConfig {
            upload_dir: data_dir.path().join("uploads"),
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
    }
}

/// Find an available TCP port
pub fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to random port")
        .local_addr()
        .expect("Failed to get local address")
        .port()
}
