//! Upload acknowledgment returned to clients.

use serde::{Deserialize, Serialize};

/// Message returned for every successful upload
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully!";

/// Response body for a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    /// File name exactly as supplied by the client
    pub file_name: String,
}

impl UploadResponse {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            file_name: file_name.into(),
        }
    }
}
