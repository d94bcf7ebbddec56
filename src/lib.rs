//! # Chat Relay Server
//!
//! A small HTTP backend for a browser chat frontend.
//!
//! ## Features
//!
//! - **Chat relay**: forwards each chat turn to an automation webhook (such as
//!   an n8n workflow) and returns its plain-text reply
//! - **File upload**: writes a multipart upload to a local directory
//! - **Health API**: liveness and readiness checks
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 HTTP Server                  │
//! │  ┌───────────┐  ┌────────────┐  ┌─────────┐  │
//! │  │ Chat API  │  │ Upload API │  │ Health  │  │
//! │  └─────┬─────┘  └─────┬──────┘  └─────────┘  │
//! ├────────┼──────────────┼──────────────────────┤
//! │  ┌─────┴─────┐  ┌─────┴──────┐               │
//! │  │  Webhook  │  │   Upload   │               │
//! │  │  Client   │  │  Storage   │               │
//! │  └─────┬─────┘  └─────┬──────┘               │
//! └────────┼──────────────┼──────────────────────┘
//!          ▼              ▼
//!   automation webhook   uploads/
//! ```
//!
//! ## Security
//!
//! There is no authentication and no CSRF protection on any endpoint; CORS
//! allows every origin so the frontend can be served from anywhere. Uploaded
//! file names are not sanitized. Put the server behind something that enforces
//! access control before exposing it.
//!
//! ## Usage
//!
//! ```bash
//! # Start the server
//! WEB_HOOK_URL=http://localhost:5678/webhook/chat cargo run --release
//!
//! # Chat
//! curl -X POST http://localhost:8000/chat/ \
//!   -d '{"sessionId": "s1", "chatInput": "hello"}'
//!
//! # Upload a file
//! curl -X POST http://localhost:8000/upload/ -F "file=@notes.txt"
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Run the chat relay server with the given configuration.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(&config)?;

    if let Some(problem) = config.webhook.url_problem() {
        warn!(%problem, "Webhook URL is unusable; chat replies will report the request error");
    } else if state.webhook_configured() {
        info!("Webhook relay configured");
    } else {
        warn!(
            env = crate::config::WEBHOOK_URL_ENV,
            "No webhook URL configured; chat replies will report the missing URL"
        );
    }

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!(
        address = %addr,
        upload_dir = %config.storage.upload_dir.display(),
        "API server starting"
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(handlers::chat_routes())
        .merge(handlers::upload_routes())
        .nest("/health", handlers::health_routes())
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
