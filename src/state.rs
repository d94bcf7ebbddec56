//! Application state management.
//!
//! This module defines the shared application state that is accessible
//! from all request handlers via Axum's State extractor. Everything in it is
//! immutable after startup.
//!
//! # Usage
//!
//! ```rust,ignore
//! async fn handler(State(state): State<AppState>) -> impl IntoResponse {
//!     let reply = state.webhook.send(&payload).await;
//!     // ...
//! }
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::services::{UploadStorage, WebhookClient};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Client for the automation webhook
    pub webhook: Arc<WebhookClient>,

    /// Storage service for uploaded files
    pub storage: Arc<UploadStorage>,
}

impl AppState {
    /// Create a new application state
    ///
    /// # Errors
    /// Returns error if services cannot be initialized
    pub fn new(config: &Config) -> Result<Self> {
        let webhook = WebhookClient::new(&config.webhook)?;
        let storage = UploadStorage::new(&config.storage);

        Ok(Self {
            webhook: Arc::new(webhook),
            storage: Arc::new(storage),
        })
    }

    /// Check if the webhook URL is set
    pub fn webhook_configured(&self) -> bool {
        self.webhook.is_configured()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("webhook", &"<WebhookClient>")
            .field("storage", &self.storage.upload_dir())
            .finish()
    }
}
