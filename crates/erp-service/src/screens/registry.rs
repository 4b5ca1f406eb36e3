//! Screen registry and the list fetchers of mounted screens.
//!
//! Mounting a list screen creates its [`ListFetcher`] with the screen's
//! initial parameters and runs the first fetch. The fetcher lives until
//! the screen is unmounted; mounting an already mounted screen returns the
//! existing fetcher with its current parameters.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use erp_core::config::ConsoleConfig;
use erp_core::error::AppError;
use erp_core::result::AppResult;
use erp_core::traits::QueryBackend;

use crate::fetch::ListFetcher;

use super::definition::{ScreenDefinition, console_screens};

/// A list fetcher yielding raw rows, shared by every list screen.
pub type ScreenFetcher = ListFetcher<Value>;

/// All console screens and the fetchers of the mounted ones.
#[derive(Debug)]
pub struct ScreenRegistry {
    /// Backend handed to new fetchers.
    backend: Arc<dyn QueryBackend>,
    /// Screens in menu order.
    screens: Vec<ScreenDefinition>,
    /// Page size for screens without their own.
    default_page_size: u64,
    /// Largest page size a client may request.
    max_page_size: u64,
    /// Fetchers of mounted screens, by key.
    mounted: RwLock<HashMap<&'static str, Arc<ScreenFetcher>>>,
}

impl ScreenRegistry {
    /// Registry of the console screens.
    pub fn new(backend: Arc<dyn QueryBackend>, console: &ConsoleConfig) -> Self {
        Self::with_screens(backend, console, console_screens())
    }

    /// Registry of the given screens.
    pub fn with_screens(
        backend: Arc<dyn QueryBackend>,
        console: &ConsoleConfig,
        screens: Vec<ScreenDefinition>,
    ) -> Self {
        Self {
            backend,
            screens,
            default_page_size: console.default_page_size.max(1),
            max_page_size: console.max_page_size.max(1),
            mounted: RwLock::new(HashMap::new()),
        }
    }

    /// Screens in menu order.
    pub fn screens(&self) -> &[ScreenDefinition] {
        &self.screens
    }

    /// Screen by key.
    pub fn find(&self, key: &str) -> Option<&ScreenDefinition> {
        self.screens.iter().find(|s| s.key == key)
    }

    /// Screen by navigation path.
    pub fn by_path(&self, path: &str) -> Option<&ScreenDefinition> {
        self.screens.iter().find(|s| s.path == path)
    }

    /// Largest page size a client may request.
    pub fn max_page_size(&self) -> u64 {
        self.max_page_size
    }

    /// Mount a list screen, running its first fetch. Returns the existing
    /// fetcher when the screen is already mounted.
    pub async fn mount(&self, key: &str) -> AppResult<Arc<ScreenFetcher>> {
        if let Some(fetcher) = self.fetcher(key).await {
            return Ok(fetcher);
        }

        let screen = self
            .find(key)
            .ok_or_else(|| AppError::not_found(format!("Unknown screen: {key}")))?;
        let source = screen
            .source
            .as_ref()
            .ok_or_else(|| AppError::validation(format!("Screen {key} has no list")))?;

        let fetcher = {
            let mut mounted = self.mounted.write().await;
            if let Some(existing) = mounted.get(screen.key) {
                return Ok(Arc::clone(existing));
            }
            let fetcher = Arc::new(
                ListFetcher::new(
                    Arc::clone(&self.backend),
                    source.table,
                    screen.initial_params(self.default_page_size),
                )
                .with_selection(source.selection.clone())
                .with_default_order(source.default_order.clone())
                .with_key_columns(source.key_columns),
            );
            mounted.insert(screen.key, Arc::clone(&fetcher));
            fetcher
        };

        info!(screen = screen.key, table = source.table, "Screen mounted");
        fetcher.refetch().await;
        Ok(fetcher)
    }

    /// Fetcher of a mounted screen.
    pub async fn fetcher(&self, key: &str) -> Option<Arc<ScreenFetcher>> {
        self.mounted.read().await.get(key).cloned()
    }

    /// Drop a screen's fetcher. Returns whether it was mounted.
    pub async fn unmount(&self, key: &str) -> bool {
        let removed = self.mounted.write().await.remove(key).is_some();
        if removed {
            info!(screen = key, "Screen unmounted");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erp_core::error::ErrorKind;
    use erp_core::types::FetchParamsPatch;
    use erp_database::MemoryBackend;
    use serde_json::json;

    async fn orders_backend() -> Arc<MemoryBackend> {
        let backend = Arc::new(MemoryBackend::new());
        let rows = (1..=25)
            .map(|i| {
                json!({
                    "data_pedido": format!("2024-01-{i:02}T12:00:00Z"),
                    "status": if i % 2 == 0 { "pending" } else { "shipped" },
                    "total": i as f64,
                    "fornecedor_id": 1,
                })
            })
            .collect();
        backend.seed("pedidos", rows).await;
        backend
    }

    #[tokio::test]
    async fn test_mount_orders_screen() {
        let registry = ScreenRegistry::new(orders_backend().await, &ConsoleConfig::default());

        let fetcher = registry.mount("orders").await.expect("mount");
        let state = fetcher.snapshot();
        assert_eq!(state.total_count, 25);
        assert_eq!(state.data.len(), 10);
        assert_eq!(state.data[0]["data_pedido"], json!("2024-01-25T12:00:00Z"));
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_remount_keeps_parameters_until_unmounted() {
        let registry = ScreenRegistry::new(orders_backend().await, &ConsoleConfig::default());
        let fetcher = registry.mount("orders").await.expect("mount");
        fetcher
            .update_fetch_params(FetchParamsPatch::page(2))
            .await
            .expect("page");

        let again = registry.mount("orders").await.expect("remount");
        assert_eq!(again.fetch_params().page, 2);
        assert_eq!(again.snapshot().data.len(), 5);

        assert!(registry.unmount("orders").await);
        assert!(registry.fetcher("orders").await.is_none());
        let fresh = registry.mount("orders").await.expect("mount");
        assert_eq!(fresh.fetch_params().page, 0);
    }

    #[tokio::test]
    async fn test_mount_rejects_unknown_and_non_list_screens() {
        let registry = ScreenRegistry::new(Arc::new(MemoryBackend::new()), &ConsoleConfig::default());
        let err = registry.mount("reports").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = registry.mount("dashboard").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(registry.by_path("/orders").map(|s| s.key), Some("orders"));
    }
}
