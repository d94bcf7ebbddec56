//! Upload handler for receiving files.
//!
//! `POST /upload/` accepts a multipart form with a `file` field and writes the
//! file into the upload directory under the client's file name, replacing any
//! earlier upload with that name. The destination only changes once the whole
//! file has arrived.
//!
//! # Example
//!
//! ```bash
//! curl -X POST http://localhost:8000/upload/ \
//!   -F "file=@notes.txt"
//! ```

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::UploadResponse;
use crate::state::AppState;

/// Name of the multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// Handle file upload via multipart form
///
/// POST /upload/
///
/// The file part is streamed chunk by chunk to disk; it is never buffered
/// whole. Parts other than `file`, and a `file` part without a file name,
/// are skipped.
async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| {
        debug!(error = %e, "Rejected upload body");
        AppError::InvalidRequest
    })?;

    while let Some(mut field) = multipart.next_field().await.map_err(invalid_multipart)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        let mut pending = state.storage.begin(&file_name).await?;

        while let Some(chunk) = field.chunk().await.map_err(invalid_multipart)? {
            pending.write_chunk(&chunk).await?;
        }

        let size = pending.written();
        let path = pending.commit().await?;

        info!(file_name = %file_name, path = %path.display(), size, "Stored upload");

        return Ok(Json(UploadResponse::new(file_name)));
    }

    Err(AppError::InvalidRequest)
}

fn invalid_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    debug!(error = %e, "Malformed multipart data");
    AppError::InvalidRequest
}

/// Any method other than POST
async fn invalid_method() -> AppError {
    AppError::InvalidRequest
}

/// Create upload routes
pub fn upload_routes() -> Router<AppState> {
    let upload_handler = post(upload).fallback(invalid_method);

    Router::new()
        .route("/upload/", upload_handler.clone())
        .route("/upload", upload_handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, StorageConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "X-TEST-BOUNDARY";

    fn app(dir: &TempDir) -> Router {
        app_writing_to(dir.path().join("uploads"))
    }

    fn app_writing_to(upload_dir: PathBuf) -> Router {
        let config = Config {
            storage: StorageConfig { upload_dir },
            ..Config::default()
        };
        upload_routes().with_state(AppState::new(&config).unwrap())
    }

    fn multipart_body(field: &str, file_name: Option<&str>, content: &str) -> String {
        let disposition = match file_name {
            Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
            None => format!("form-data; name=\"{}\"", field),
        };
        format!(
            "--{b}\r\nContent-Disposition: {d}\r\nContent-Type: text/plain\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            d = disposition,
            c = content
        )
    }

    fn post_multipart(body: String) -> Request<Body> {
        Request::post("/upload/")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_upload_writes_file() {
        let dir = TempDir::new().unwrap();
        let request = post_multipart(multipart_body("file", Some("a.txt"), "hello"));

        let (status, json) = send(app(&dir), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "File uploaded successfully!");
        assert_eq!(json["file_name"], "a.txt");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("uploads/a.txt")).unwrap(),
            "hello"
        );
    }

    #[tokio::test]
    async fn test_wrong_field_name() {
        let dir = TempDir::new().unwrap();
        let request = post_multipart(multipart_body("document", Some("a.txt"), "hello"));

        let (status, json) = send(app(&dir), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid request");
    }

    #[tokio::test]
    async fn test_field_without_file_name() {
        let dir = TempDir::new().unwrap();
        let request = post_multipart(multipart_body("file", None, "just text"));

        let (status, json) = send(app(&dir), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid request");
    }

    #[tokio::test]
    async fn test_non_multipart_body() {
        let dir = TempDir::new().unwrap();
        let request = Request::post("/upload/")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let (status, json) = send(app(&dir), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid request");
    }

    #[tokio::test]
    async fn test_get_is_invalid_request() {
        let dir = TempDir::new().unwrap();
        let request = Request::get("/upload/").body(Body::empty()).unwrap();

        let (status, json) = send(app(&dir), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid request");
        assert!(!dir.path().join("uploads").exists());
    }

    #[tokio::test]
    async fn test_broken_stream_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let upload_dir = dir.path().join("uploads");
        std::fs::create_dir_all(&upload_dir).unwrap();
        std::fs::write(upload_dir.join("a.txt"), "original").unwrap();

        // Body ends mid-part, without a closing boundary
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\r\nhalf of the new",
            b = BOUNDARY
        );

        let (status, json) = send(app(&dir), post_multipart(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid request");
        assert_eq!(
            std::fs::read_to_string(upload_dir.join("a.txt")).unwrap(),
            "original"
        );
        assert_eq!(std::fs::read_dir(&upload_dir).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_filesystem_error_is_server_error() {
        let dir = TempDir::new().unwrap();
        let request = post_multipart(multipart_body("file", Some("nodir/a.txt"), "hello"));

        let (status, json) = send(app(&dir), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json["error"],
            "An internal error occurred. Please try again later."
        );
        assert_eq!(
            std::fs::read_dir(dir.path().join("uploads")).unwrap().count(),
            0
        );
    }

    #[tokio::test]
    async fn test_escaping_name_is_written_as_given() {
        let dir = TempDir::new().unwrap();
        let upload_dir = dir.path().join("nested").join("uploads");
        let request = post_multipart(multipart_body("file", Some("../escaped.txt"), "outside"));

        let (status, json) = send(app_writing_to(upload_dir.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["file_name"], "../escaped.txt");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("nested").join("escaped.txt")).unwrap(),
            "outside"
        );
        assert_eq!(std::fs::read_dir(&upload_dir).unwrap().count(), 0);
    }
}
