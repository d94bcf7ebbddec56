//! Chat request and webhook payload types.
//!
//! A `ChatRequest` is what the browser sends; a `WebhookPayload` is what gets
//! relayed to the automation service. Neither outlives the request.
//!
//! Field values are relayed as the client sent them, whatever their JSON type.
//! Only their truthiness is checked: a missing field, `null`, `""`, `0`,
//! `false`, `[]` and `{}` all count as absent.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// Action name the automation workflow expects for chat turns
pub const SEND_MESSAGE_ACTION: &str = "sendMessage";

/// Incoming chat message
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// Top-level JSON object of the request body
    fields: Map<String, Value>,
}

impl ChatRequest {
    /// Parse a chat request from a raw request body
    ///
    /// Duplicate keys keep the last value.
    ///
    /// # Errors
    /// Returns `AppError::InvalidJson` if the body is not a JSON object
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!(error = %e, "Rejected chat body");
            AppError::InvalidJson
        })?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => {
                tracing::debug!(kind = json_kind(&other), "Chat body is not an object");
                Err(AppError::InvalidJson)
            }
        }
    }

    /// Build the webhook payload, requiring both fields to be truthy
    ///
    /// # Errors
    /// Returns `AppError::MissingChatField` if either field is missing or falsy
    pub fn into_payload(mut self) -> Result<WebhookPayload> {
        let session_id = self.fields.remove("sessionId").filter(is_truthy);
        let chat_input = self.fields.remove("chatInput").filter(is_truthy);

        match (session_id, chat_input) {
            (Some(session_id), Some(chat_input)) => {
                Ok(WebhookPayload::send_message(session_id, chat_input))
            }
            _ => Err(AppError::MissingChatField),
        }
    }
}

/// Outbound payload posted to the automation webhook
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub session_id: Value,
    pub action: &'static str,
    pub chat_input: Value,
}

impl WebhookPayload {
    /// Create a `sendMessage` payload
    pub fn send_message(session_id: impl Into<Value>, chat_input: impl Into<Value>) -> Self {
        Self {
            session_id: session_id.into(),
            action: SEND_MESSAGE_ACTION,
            chat_input: chat_input.into(),
        }
    }
}

/// Python-style truthiness of a JSON value
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
