/// Storage for uploaded candidate documents
///
/// Handlers only see opaque keys returned by [`DocumentStore::put`]; the
/// database stores the key in `documents.file_path`.

pub mod local;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

pub use local::LocalDocumentStore;

/// Extensions accepted for upload
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File type not allowed: {0}")]
    UnsupportedType(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lowercased extension of `filename` if it is an allowed upload type
pub fn allowed_extension(filename: &str) -> Result<String, StorageError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| StorageError::UnsupportedType(filename.to_string()))?;

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(StorageError::UnsupportedType(filename.to_string()))
    }
}

/// MIME type for an allowed extension
pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores `bytes` for `user_id` and returns the key
    async fn put(&self, user_id: Uuid, filename: &str, bytes: Bytes) -> Result<String, StorageError>;

    async fn get(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Removes a stored file; missing files are not an error
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
