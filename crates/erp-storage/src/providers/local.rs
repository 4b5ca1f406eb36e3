//! Local filesystem storage provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use erp_core::error::{AppError, ErrorKind};
use erp_core::result::AppResult;
use erp_core::traits::{ObjectStorage, StoredObject};

use super::clean_object_path;

/// Bucket stored as a directory under a root path.
///
/// Objects are served by the HTTP surface under `public_base_url`, so
/// the public URL of `a.png` is `{public_base_url}/{bucket}/a.png`.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Directory holding the bucket's objects.
    root: PathBuf,
    bucket: String,
    public_base_url: String,
}

impl LocalStorageProvider {
    /// Create the provider, creating `{root_path}/{bucket}` if needed.
    pub async fn new(root_path: &str, bucket: &str, public_base_url: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path).join(bucket);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            bucket: bucket.to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Directory holding the bucket's objects.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        Ok(self.root.join(clean_object_path(path)?))
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Read an object back, for serving it over HTTP.
    pub async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read object: {path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> AppResult<StoredObject> {
        let full_path = self.resolve(path)?;
        if fs::try_exists(&full_path).await.unwrap_or(false) {
            return Err(AppError::conflict(format!("Object already exists: {path}")));
        }
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {path}"),
                e,
            )
        })?;

        debug!(path, bytes = data.len(), content_type, "Stored object");
        Ok(StoredObject {
            path: clean_object_path(path)?,
            size_bytes: data.len() as u64,
            public_url: self.public_url(path),
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url,
            self.bucket,
            path.trim_start_matches('/')
        )
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete object: {path}"),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn provider(dir: &tempfile::TempDir) -> LocalStorageProvider {
        LocalStorageProvider::new(
            dir.path().to_str().expect("utf-8 path"),
            "product-images",
            "http://localhost:8080/files/",
        )
        .await
        .expect("provider")
    }

    #[tokio::test]
    async fn test_upload_read_delete() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = provider(&dir).await;

        let stored = storage
            .upload("nested/photo.png", Bytes::from_static(b"\x89PNG"), Some("image/png"))
            .await
            .expect("upload");
        assert_eq!(stored.size_bytes, 4);
        assert_eq!(
            stored.public_url,
            "http://localhost:8080/files/product-images/nested/photo.png"
        );
        assert!(dir.path().join("product-images/nested/photo.png").exists());
        assert_eq!(
            storage.read_bytes("nested/photo.png").await.expect("read"),
            Bytes::from_static(b"\x89PNG")
        );

        storage.delete("nested/photo.png").await.expect("delete");
        storage.delete("nested/photo.png").await.expect("idempotent delete");
        assert!(storage.read_bytes("nested/photo.png").await.is_err());
    }

    #[tokio::test]
    async fn test_upload_does_not_overwrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = provider(&dir).await;
        storage
            .upload("a.png", Bytes::from_static(b"one"), None)
            .await
            .expect("upload");
        let err = storage
            .upload("a.png", Bytes::from_static(b"two"), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = provider(&dir).await;
        let err = storage
            .upload("../escape.png", Bytes::from_static(b"x"), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(storage.health_check().await.expect("health"));
    }
}
