//! Name-only lookup tables managed from small dialogs.

use std::sync::Arc;

use tracing::info;

use erp_core::error::AppError;
use erp_core::result::AppResult;
use erp_core::traits::{QueryBackend, Repository, TableRow};
use erp_core::types::{FilterField, SortField};
use erp_database::TableRepository;

use crate::context::RequestContext;

/// Name column shared by every lookup table.
const NAME_COLUMN: &str = "nome";

/// A table whose rows are identified to the user by their name alone
/// (banks, card networks).
pub struct NameCatalog<T> {
    repo: TableRepository<T>,
}

impl<T> Clone for NameCatalog<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<T: TableRow> std::fmt::Debug for NameCatalog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameCatalog")
            .field("table", &T::TABLE)
            .finish()
    }
}

impl<T> NameCatalog<T>
where
    T: TableRow,
    T::New: From<String>,
{
    /// Creates a catalog over `T`'s table.
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            repo: TableRepository::new(backend),
        }
    }

    /// Every entry, ordered by name.
    pub async fn list(&self) -> AppResult<Vec<T>> {
        self.repo
            .find_where(&[], Some(SortField::asc(NAME_COLUMN)))
            .await
    }

    /// Adds an entry. Surrounding whitespace is dropped; a blank name is
    /// rejected.
    pub async fn add(&self, ctx: &RequestContext, name: &str) -> AppResult<T> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        let row = self.repo.insert(&T::New::from(name.to_string())).await?;
        info!(table = T::TABLE, name, user_id = %ctx.user_id(), "Lookup entry added");
        Ok(row)
    }

    /// Deletes every entry named exactly `name`; `NotFound` when none exists.
    pub async fn remove(&self, ctx: &RequestContext, name: &str) -> AppResult<u64> {
        let removed = self
            .repo
            .delete_where(&[FilterField::eq(NAME_COLUMN, name)])
            .await?;
        if removed == 0 {
            return Err(AppError::not_found(format!("\"{name}\" not found")));
        }
        info!(table = T::TABLE, name, removed, user_id = %ctx.user_id(), "Lookup entry removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erp_core::error::ErrorKind;
    use erp_database::MemoryBackend;
    use erp_entity::finance::{Bank, CardNetwork};

    use crate::context::test_context as ctx;

    #[tokio::test]
    async fn test_banks_listed_by_name_and_trimmed() {
        let catalog = NameCatalog::<Bank>::new(Arc::new(MemoryBackend::new()));
        catalog.add(&ctx(), "  Itau ").await.expect("add");
        catalog.add(&ctx(), "Bradesco").await.expect("add");
        catalog.add(&ctx(), "Caixa").await.expect("add");

        let names: Vec<String> = catalog
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Bradesco", "Caixa", "Itau"]);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let backend = Arc::new(MemoryBackend::new());
        let catalog = NameCatalog::<CardNetwork>::new(backend.clone());
        let err = catalog.add(&ctx(), "   ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(backend.dump("bandeiras_cartao").await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_by_name() {
        let catalog = NameCatalog::<CardNetwork>::new(Arc::new(MemoryBackend::new()));
        catalog.add(&ctx(), "Visa").await.expect("add");
        catalog.add(&ctx(), "Elo").await.expect("add");

        assert_eq!(catalog.remove(&ctx(), "Visa").await.expect("remove"), 1);
        let remaining = catalog.list().await.expect("list");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Elo");

        let err = catalog.remove(&ctx(), "Visa").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
