//! Hosted storage API provider.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use tracing::{debug, warn};

use erp_core::error::{AppError, ErrorKind};
use erp_core::result::AppResult;
use erp_core::traits::{ObjectStorage, StoredObject};
use erp_database::HostedClient;

use super::clean_object_path;

/// One public bucket of the hosted service's storage API.
#[derive(Debug, Clone)]
pub struct RestObjectStorage {
    client: HostedClient,
    bucket: String,
}

impl RestObjectStorage {
    /// Create a provider for `bucket`.
    pub fn new(client: HostedClient, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }

    /// `{base}/storage/v1/{segments...}` with every segment percent-encoded.
    fn url(&self, segments: &[&str], object_path: Option<&str>) -> AppResult<Url> {
        let mut url = self.client.endpoint("storage/v1/")?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| AppError::configuration("Backend URL cannot be a base"))?;
            path.pop_if_empty();
            path.extend(segments);
            if let Some(object_path) = object_path {
                path.extend(object_path.split('/'));
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ObjectStorage for RestObjectStorage {
    fn provider_type(&self) -> &str {
        "rest"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn health_check(&self) -> AppResult<bool> {
        let url = self.url(&["bucket", &self.bucket], None)?;
        match self
            .client
            .send(self.client.authorize(self.client.http().get(url)))
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(bucket = %self.bucket, error = %e, "Storage health check failed");
                Ok(false)
            }
        }
    }

    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> AppResult<StoredObject> {
        let path = clean_object_path(path)?;
        let url = self.url(&["object", &self.bucket], Some(&path))?;
        let size_bytes = data.len() as u64;
        let request = self
            .client
            .http()
            .post(url)
            .header(
                CONTENT_TYPE,
                content_type.unwrap_or("application/octet-stream"),
            )
            .header("x-upsert", "false")
            .body(data);
        self.client
            .send(self.client.authorize(request))
            .await
            .map_err(storage_error)?;

        debug!(bucket = %self.bucket, path = %path, bytes = size_bytes, "Uploaded object");
        Ok(StoredObject {
            public_url: self.public_url(&path),
            path,
            size_bytes,
        })
    }

    fn public_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        match self.url(&["object", "public", &self.bucket], Some(path)) {
            Ok(url) => url.to_string(),
            Err(_) => format!("storage/v1/object/public/{}/{path}", self.bucket),
        }
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let path = clean_object_path(path)?;
        let url = self.url(&["object", &self.bucket], None)?;
        let request = self
            .client
            .http()
            .delete(url)
            .json(&json!({ "prefixes": [path] }));
        self.client
            .send(self.client.authorize(request))
            .await
            .map_err(storage_error)?;
        debug!(bucket = %self.bucket, path = %path, "Deleted object");
        Ok(())
    }
}

/// Rejections that are not auth, conflict or not-found are storage faults.
fn storage_error(mut err: AppError) -> AppError {
    if err.kind == ErrorKind::Database {
        err.kind = ErrorKind::Storage;
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn storage(server: &MockServer) -> RestObjectStorage {
        let client =
            HostedClient::with_base_url(&server.base_url(), "anon", Duration::from_secs(5), None)
                .expect("client");
        RestObjectStorage::new(client, "product-images")
    }

    #[tokio::test]
    async fn test_upload_posts_bytes_and_returns_public_url() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/storage/v1/object/product-images/abc.png")
                    .header("content-type", "image/png")
                    .header("apikey", "anon")
                    .body("PNGDATA");
                then.status(200)
                    .json_body(serde_json::json!({"Key": "product-images/abc.png"}));
            })
            .await;

        let storage = storage(&server);
        let stored = storage
            .upload("abc.png", Bytes::from_static(b"PNGDATA"), Some("image/png"))
            .await
            .expect("upload");
        mock.assert_async().await;
        assert_eq!(stored.size_bytes, 7);
        assert_eq!(
            stored.public_url,
            format!(
                "{}/storage/v1/object/public/product-images/abc.png",
                server.base_url()
            )
        );
    }

    #[tokio::test]
    async fn test_upload_failure_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/storage/v1/object/product-images/abc.png");
                then.status(409)
                    .json_body(serde_json::json!({"error": "Duplicate", "message": "The resource already exists"}));
            })
            .await;

        let err = storage(&server)
            .upload("abc.png", Bytes::from_static(b"x"), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "The resource already exists");
    }

    #[tokio::test]
    async fn test_delete_sends_prefixes() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/storage/v1/object/product-images")
                    .json_body(serde_json::json!({"prefixes": ["old.jpg"]}));
                then.status(200).json_body(serde_json::json!([]));
            })
            .await;
        storage(&server).delete("old.jpg").await.expect("delete");
        mock.assert_async().await;
    }
}
