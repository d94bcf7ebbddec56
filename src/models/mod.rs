//! Data models for the chat relay server.
//!
//! This module contains the data transfer objects (DTOs) exchanged with
//! clients and with the automation webhook.

mod chat;
mod upload;

pub use chat::*;
pub use upload::*;
