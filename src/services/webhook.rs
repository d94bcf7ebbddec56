//! Outbound client for the automation webhook.
//!
//! One `reqwest::Client` is built at startup and reused for every chat turn,
//! so connections to the webhook host are pooled. No request timeout is set:
//! a chat turn waits as long as the automation workflow takes.

use crate::config::{WebhookConfig, WEBHOOK_URL_ENV};
use crate::error::{AppError, Result};
use crate::models::WebhookPayload;
use thiserror::Error;
use tracing::debug;

/// Failure while talking to the webhook
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No webhook URL was configured
    #[error("webhook URL is not configured (set {})", WEBHOOK_URL_ENV)]
    NotConfigured,

    /// Network failure or non-2xx response
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// Client relaying chat payloads to the automation webhook
#[derive(Debug, Clone)]
pub struct WebhookClient {
    /// Target URL, if configured
    url: Option<String>,
    /// HTTP client for webhook calls
    client: reqwest::Client,
}

impl WebhookClient {
    /// Create a new webhook client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: config.url.clone().filter(|url| !url.is_empty()),
            client,
        })
    }

    /// Check if a target URL is set
    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Post a payload and return the response body as text
    ///
    /// # Errors
    /// Returns `WebhookError` if no URL is configured, the request fails, or
    /// the webhook answers with a non-2xx status
    pub async fn send(&self, payload: &WebhookPayload) -> std::result::Result<String, WebhookError> {
        let url = self.url.as_deref().ok_or(WebhookError::NotConfigured)?;

        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;

        let status = response.status();
        let text = response.text().await?;

        debug!(
            session_id = %payload.session_id,
            status = %status,
            reply_len = text.len(),
            "Webhook replied"
        );

        Ok(text)
    }
}
