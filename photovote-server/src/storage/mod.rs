//! Blob storage for uploaded images
//!
//! Handlers only see [`BlobStore`]; the bundled implementation keeps files
//! on local disk and the router serves them back under `/media`.

pub mod local;

use async_trait::async_trait;

pub use local::LocalBlobStore;

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid object key: {0}")]
    InvalidKey(String),
}

/// Write-only object store returning public URLs
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key` and return the URL clients can fetch it from.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, BlobError>;
}

/// Object key for a freshly uploaded photo
pub fn photo_key() -> String {
    format!("photos/{}.jpg", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_keys_are_unique_jpegs() {
        let a = photo_key();
        let b = photo_key();
        assert!(a.starts_with("photos/") && a.ends_with(".jpg"));
        assert_ne!(a, b);
    }
}
