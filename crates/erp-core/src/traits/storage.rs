//! Object storage contract for product images.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// An object written to the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Path inside the bucket.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Publicly readable URL.
    pub public_url: String,
}

/// A single public bucket addressed by object path.
///
/// Implementations exist for the hosted storage API and the local
/// filesystem, in `erp-storage`.
#[async_trait]
pub trait ObjectStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "rest", "local").
    fn provider_type(&self) -> &str;

    /// Bucket this provider writes to.
    fn bucket(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write `data` at `path`.
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> AppResult<StoredObject>;

    /// Public URL of the object at `path`. Does not check existence.
    fn public_url(&self, path: &str) -> String;

    /// Delete the object at `path`.
    async fn delete(&self, path: &str) -> AppResult<()>;
}
