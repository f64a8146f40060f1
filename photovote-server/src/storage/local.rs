//! Filesystem-backed blob store

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{BlobError, BlobStore};

/// Stores objects under `root`, addressed as `<public_base>/<key>`
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, BlobError> {
        let relative = Path::new(key);
        let clean = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(BlobError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(relative))
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, BlobError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let size = bytes.len();
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(key, size, content_type, "blob stored");
        Ok(self.url_for(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:3030/media/");

        let url = store
            .put("photos/abc.jpg", b"jpeg".to_vec(), "image/jpeg")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3030/media/photos/abc.jpg");
        let stored = std::fs::read(dir.path().join("photos/abc.jpg")).unwrap();
        assert_eq!(stored, b"jpeg");
    }

    #[tokio::test]
    async fn rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost/media");

        for key in ["../etc/passwd", "/abs.jpg", "", "photos/../../x.jpg"] {
            let err = store.put(key, vec![1], "image/jpeg").await.unwrap_err();
            assert!(matches!(err, BlobError::InvalidKey(_)), "{key}");
        }
    }
}
