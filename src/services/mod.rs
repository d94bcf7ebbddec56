//! Service layer for the chat relay server.
//!
//! This module contains the two pieces of I/O the handlers delegate to:
//! - Relaying chat payloads to the automation webhook
//! - Writing uploaded files to disk

pub mod storage;
pub mod webhook;

pub use storage::{PendingUpload, UploadStorage};
pub use webhook::{WebhookClient, WebhookError};
