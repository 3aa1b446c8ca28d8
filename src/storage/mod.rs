//! Local filesystem storage for uploaded product images.
//!
//! Files are written under the configured uploads directory with generated,
//! collision-resistant names, and served back via `/uploads/{filename}`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create uploads directory: {0}")]
    CreateDir(std::io::Error),

    #[error("failed to write image file: {0}")]
    Write(std::io::Error),
}

/// Full-UUID filename preserving the original extension (used on create).
pub fn unique_name(original: &str) -> String {
    format!("{}{}", Uuid::new_v4(), extension_of(original))
}

/// Shorter 8-hex-char variant (used on update), still collision-resistant
/// in practice for a single uploads directory.
pub fn short_unique_name(original: &str) -> String {
    let id = Uuid::new_v4().to_string();
    format!("{}{}", &id[..8], extension_of(original))
}

fn extension_of(original: &str) -> String {
    Path::new(original)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

fn upload_dir() -> PathBuf {
    PathBuf::from(&config::config().upload_dir)
}

/// Publicly reachable URL for a stored filename.
pub fn public_url(filename: &str) -> String {
    format!("{}/uploads/{}", config::config().public_url, filename)
}

/// Persist image bytes under the uploads directory, creating it if needed.
/// Returns the public URL of the stored file.
pub async fn save(filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
    let dir = upload_dir();
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(StorageError::CreateDir)?;

    tokio::fs::write(dir.join(filename), bytes)
        .await
        .map_err(StorageError::Write)?;

    Ok(public_url(filename))
}

/// Best-effort removal of a stored image referenced by its public URL.
/// Errors are logged and swallowed; a missing file is not a failure.
pub async fn remove_by_url(image_url: &str) {
    let Some(filename) = filename_from_url(image_url) else {
        warn!("not removing image with unrecognized URL: {}", image_url);
        return;
    };

    let path = upload_dir().join(filename);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => debug!("removed image file {}", path.display()),
        Err(e) => debug!("could not remove image file {}: {}", path.display(), e),
    }
}

/// Extract the stored filename from a public upload URL, rejecting anything
/// that could escape the uploads directory.
fn filename_from_url(image_url: &str) -> Option<&str> {
    let (_, filename) = image_url.rsplit_once("/uploads/")?;
    if filename.is_empty() || !is_safe_filename(filename) {
        return None;
    }
    Some(filename)
}

fn is_safe_filename(name: &str) -> bool {
    !name.contains('/') && !name.contains('\\') && !name.contains("..")
}
