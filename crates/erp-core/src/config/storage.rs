//! Product image storage configuration.

use serde::{Deserialize, Serialize};

/// Which object storage provider to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// The hosted service's storage API (shares `backend.url`).
    Rest,
    /// A directory on the local filesystem.
    #[default]
    Local,
}

/// Object storage configuration for product images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Provider to use.
    #[serde(default)]
    pub mode: StorageMode,
    /// Bucket holding product images.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Root directory for the local provider.
    #[serde(default = "default_local_root")]
    pub local_root: String,
    /// Public base URL under which local objects are served.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Maximum accepted image size in bytes.
    #[serde(default = "default_max_image")]
    pub max_image_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::default(),
            bucket: default_bucket(),
            local_root: default_local_root(),
            public_base_url: default_public_base_url(),
            max_image_bytes: default_max_image(),
        }
    }
}

fn default_bucket() -> String {
    "product-images".to_string()
}

fn default_local_root() -> String {
    "./data/storage".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/files".to_string()
}

fn default_max_image() -> usize {
    5 * 1024 * 1024 // 5 MB
}
