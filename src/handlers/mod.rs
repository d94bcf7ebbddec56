//! HTTP request handlers for the chat relay server.
//!
//! This module contains all endpoint handlers organized by functionality:
//! - `chat`: Relays chat messages to the automation webhook
//! - `upload`: Writes uploaded files to disk
//! - `health`: Health check endpoints

pub mod chat;
pub mod health;
pub mod upload;

pub use chat::chat_routes;
pub use health::health_routes;
pub use upload::upload_routes;
