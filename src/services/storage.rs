//! Storage service for uploaded files.
//!
//! Files land flat in a single directory under the name the client sent:
//!
//! ```text
//! uploads/
//! ├── a.txt
//! ├── report.pdf
//! └── .3f2c…e1.part      # upload in progress
//! ```
//!
//! An upload is streamed into a hidden `.part` file in the upload directory
//! and renamed over its destination once the last chunk is written. A second
//! upload with the same name replaces the first; an upload that fails halfway
//! leaves the previous file untouched. There is no locking: concurrent uploads
//! of one name race and the last rename wins.
//!
//! Names are joined onto the upload directory as given. A name containing `..`
//! or a path separator can escape the directory; such names are logged but
//! not rewritten.

use crate::config::StorageConfig;
use crate::error::Result;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Service for writing uploaded files to disk
#[derive(Debug, Clone)]
pub struct UploadStorage {
    /// Directory uploads are written to
    upload_dir: PathBuf,
}

impl UploadStorage {
    /// Create a new storage service
    ///
    /// The directory is created lazily on the first upload.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
        }
    }

    /// Directory uploads are written to
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Path an upload with the given name is written to
    pub fn destination(&self, file_name: &str) -> PathBuf {
        self.upload_dir.join(file_name)
    }

    /// Create the upload directory and its parents if missing
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.upload_dir).await?;
        Ok(())
    }

    /// Start an upload for `file_name`
    ///
    /// Nothing at the destination changes until [`PendingUpload::commit`].
    ///
    /// # Errors
    /// Returns error if the directory or the temporary file cannot be created
    pub async fn begin(&self, file_name: &str) -> Result<PendingUpload> {
        self.ensure_dir().await?;

        if escapes_directory(file_name) {
            warn!(
                file_name = %file_name,
                upload_dir = %self.upload_dir.display(),
                "Upload file name points outside the upload directory"
            );
        }

        let temp_path = self
            .upload_dir
            .join(format!(".{}.part", Uuid::new_v4().as_simple()));
        let file = fs::File::create(&temp_path).await?;

        debug!(temp = %temp_path.display(), file_name = %file_name, "Started upload");

        Ok(PendingUpload {
            file,
            temp_path,
            destination: self.destination(file_name),
            written: 0,
            committed: false,
        })
    }
}

/// An upload being written to a temporary file
///
/// Dropping it without calling [`commit`](Self::commit) deletes the temporary
/// file, which covers both error returns and cancelled requests.
#[derive(Debug)]
pub struct PendingUpload {
    file: fs::File,
    temp_path: PathBuf,
    destination: PathBuf,
    written: u64,
    committed: bool,
}

impl PendingUpload {
    /// Append a chunk
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Bytes written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Move the finished upload over its destination
    ///
    /// Returns the destination path.
    pub async fn commit(mut self) -> Result<PathBuf> {
        self.file.flush().await?;
        fs::rename(&self.temp_path, &self.destination).await?;
        self.committed = true;
        Ok(self.destination.clone())
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match std::fs::remove_file(&self.temp_path) {
            Ok(()) => debug!(temp = %self.temp_path.display(), "Discarded unfinished upload"),
            Err(e) => warn!(
                temp = %self.temp_path.display(),
                error = %e,
                "Failed to remove unfinished upload"
            ),
        }
    }
}

/// Whether joining `file_name` onto a directory can leave that directory
fn escapes_directory(file_name: &str) -> bool {
    file_name.contains('\\')
        || Path::new(file_name)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
}
