//! Error types for the chat relay server.
//!
//! This module defines a unified error handling system using `thiserror`.
//! All errors are converted to HTTP responses automatically.
//!
//! The two endpoints answer in different shapes: the chat endpoint speaks plain
//! text, the upload endpoint speaks JSON. Each variant knows which shape it
//! renders as.
//!
//! # Error Categories
//!
//! - **Client errors (4xx)**: malformed input, wrong method
//! - **Server errors (5xx)**: I/O failures while writing uploads, internal faults
//!
//! Webhook failures are not represented here: the chat handler folds them into
//! a normal reply.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    // -------------------------------------------------------------------------
    // Client Errors (4xx)
    // -------------------------------------------------------------------------
    /// Chat body is not valid JSON for a chat request
    #[error("Invalid JSON")]
    InvalidJson,

    /// Chat request lacks `sessionId` or `chatInput`
    #[error("Missing sessionId or chatInput")]
    MissingChatField,

    /// Chat endpoint called with a method other than POST
    #[error("Only POST allowed")]
    MethodNotAllowed,

    /// Upload request without a usable `file` part
    #[error("Invalid request")]
    InvalidRequest,

    // -------------------------------------------------------------------------
    // Server Errors (5xx)
    // -------------------------------------------------------------------------
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidJson => StatusCode::BAD_REQUEST,
            Self::MissingChatField => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidRequest => StatusCode::BAD_REQUEST,

            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Whether the error renders as a plain-text body
    fn is_plain_text(&self) -> bool {
        matches!(
            self,
            Self::InvalidJson | Self::MissingChatField | Self::MethodNotAllowed
        )
    }
}

/// JSON error body sent to clients
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(error = %self, "Server error occurred");
        } else {
            tracing::debug!(error = %self, "Client error occurred");
        }

        if self.is_plain_text() {
            return (status, self.to_string()).into_response();
        }

        // Don't expose internal details to clients
        let message = if self.is_server_error() {
            "An internal error occurred. Please try again later.".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}
