//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod backend;
pub mod console;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::backend::{BackendConfig, BackendMode};
pub use self::console::ConsoleConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::{StorageConfig, StorageMode};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Hosted backend (data API / direct database) settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Product image storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// List screen defaults.
    #[serde(default)]
    pub console: ConsoleConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `ERP_` (sections separated
    /// by `__`, e.g. `ERP_BACKEND__URL`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ERP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-section constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        match self.backend.mode {
            BackendMode::Rest if self.backend.url.is_empty() => {
                return Err(AppError::configuration(
                    "backend.url is required when backend.mode = \"rest\"",
                ));
            }
            BackendMode::Postgres if self.backend.database_url.is_empty() => {
                return Err(AppError::configuration(
                    "backend.database_url is required when backend.mode = \"postgres\"",
                ));
            }
            BackendMode::Postgres if self.backend.url.is_empty() => {
                return Err(AppError::configuration(
                    "backend.url is required for the auth service when backend.mode = \"postgres\"",
                ));
            }
            _ => {}
        }
        if self.storage.mode == StorageMode::Rest && self.backend.url.is_empty() {
            return Err(AppError::configuration(
                "backend.url is required when storage.mode = \"rest\"",
            ));
        }
        if self.console.default_page_size == 0
            || self.console.default_page_size > self.console.max_page_size
        {
            return Err(AppError::configuration(
                "console.default_page_size must be between 1 and console.max_page_size",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_memory_and_valid() {
        let config = AppConfig::default();
        assert_eq!(config.backend.mode, BackendMode::Memory);
        assert_eq!(config.storage.mode, StorageMode::Local);
        assert_eq!(config.console.default_page_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rest_mode_requires_url() {
        let mut config = AppConfig::default();
        config.backend.mode = BackendMode::Rest;
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("backend.url"));

        config.backend.url = "https://project.example.co".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_page_size_bounds() {
        let mut config = AppConfig::default();
        config.console.default_page_size = 500;
        assert!(config.validate().is_err());
    }
}
