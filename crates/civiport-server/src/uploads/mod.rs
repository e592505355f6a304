//! Local object store for complaint photos.
//!
//! Stores uploaded files under one directory and hands back the public URL
//! they will be served from. Storage keys are UUID-namespaced, so a client
//! filename can neither escape the directory nor collide with an earlier
//! upload.

use std::path::{Path, PathBuf};

use tracing::info;

/// Errors from the upload store.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("invalid filename")]
    InvalidFilename,
}

#[derive(Debug)]
pub struct UploadStore {
    dir: PathBuf,
    base_url: String,
}

impl UploadStore {
    /// Create the store, creating the directory if needed.
    pub fn new(dir: PathBuf, base_url: &str) -> Result<Self, UploadError> {
        std::fs::create_dir_all(&dir).map_err(|e| UploadError::Io(e.to_string()))?;

        Ok(Self {
            dir,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Directory files are written to (served via the `/uploads` route).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `bytes` under a sanitized, collision-free key and return the
    /// URL it will be served from.
    pub fn store(&self, client_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let name = sanitize_filename(client_name)?;
        let key = format!("{}_{name}", uuid::Uuid::new_v4());

        let path = self.dir.join(&key);
        std::fs::write(&path, bytes).map_err(|e| UploadError::Io(e.to_string()))?;

        info!(key = %key, size = bytes.len(), "Upload stored");

        Ok(format!("{}/uploads/{key}", self.base_url))
    }
}

/// Whitespace becomes `_` and any client-supplied directory components are
/// dropped; the stored key is always a bare file name.
fn sanitize_filename(name: &str) -> Result<String, UploadError> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .filter(|c| *c != '\0')
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Err(UploadError::InvalidFilename);
    }

    Ok(cleaned)
}
