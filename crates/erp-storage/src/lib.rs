//! # erp-storage
//!
//! Object storage for product images. One bucket, addressed by object
//! path, backed either by the hosted service's storage API or by a local
//! directory during development.

pub mod naming;
pub mod providers;

use std::sync::Arc;

use erp_core::config::{BackendConfig, StorageConfig, StorageMode};
use erp_core::result::AppResult;
use erp_core::traits::{AccessTokenSource, ObjectStorage};
use erp_database::HostedClient;

pub use naming::random_object_name;
pub use providers::{LocalStorageProvider, RestObjectStorage};

/// Build the storage provider selected by `config.mode`.
pub async fn build_storage(
    config: &StorageConfig,
    backend: &BackendConfig,
    tokens: Option<Arc<dyn AccessTokenSource>>,
) -> AppResult<Arc<dyn ObjectStorage>> {
    let storage: Arc<dyn ObjectStorage> = match config.mode {
        StorageMode::Rest => {
            let client = HostedClient::new(backend, tokens)?;
            Arc::new(RestObjectStorage::new(client, &config.bucket))
        }
        StorageMode::Local => Arc::new(
            LocalStorageProvider::new(
                &config.local_root,
                &config.bucket,
                &config.public_base_url,
            )
            .await?,
        ),
    };
    tracing::info!(
        provider = storage.provider_type(),
        bucket = storage.bucket(),
        "Object storage ready"
    );
    Ok(storage)
}
