//! Chat relay handler.
//!
//! `POST /chat/` takes `{"sessionId": "...", "chatInput": "..."}`, forwards it
//! to the automation webhook as a `sendMessage` action, and answers with the
//! webhook's reply as plain text.
//!
//! Webhook failures do not change the status code: the client gets a 200 whose
//! body describes the failure. The browser frontend renders whatever text
//! comes back, so the error ends up in the chat window.
//!
//! # Example
//!
//! ```bash
//! curl -X POST http://localhost:8000/chat/ \
//!   -H "Content-Type: application/json" \
//!   -d '{"sessionId": "session_1", "chatInput": "hello"}'
//! ```

use axum::{extract::State, routing::post, Router};
use bytes::Bytes;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::ChatRequest;
use crate::state::AppState;

/// Prefix of the reply sent when the webhook call fails
pub const WEBHOOK_ERROR_PREFIX: &str = "Error communicating with n8n";

/// Relay a chat message
///
/// POST /chat/
async fn chat(State(state): State<AppState>, body: Bytes) -> Result<String> {
    let payload = ChatRequest::from_slice(&body)?.into_payload()?;

    info!(session_id = %payload.session_id, "Relaying chat message");

    let reply = match state.webhook.send(&payload).await {
        Ok(text) => text,
        Err(e) => {
            warn!(session_id = %payload.session_id, error = %e, "Webhook call failed");
            format!("{}: {}", WEBHOOK_ERROR_PREFIX, e)
        }
    };

    Ok(reply)
}

/// Any method other than POST
async fn only_post_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Create chat routes
pub fn chat_routes() -> Router<AppState> {
    let chat_handler = post(chat).fallback(only_post_allowed);

    Router::new()
        .route("/chat/", chat_handler.clone())
        .route("/chat", chat_handler)
}
