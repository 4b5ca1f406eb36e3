//! Generic repository trait for table access.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::fetch::FetchParams;
use crate::types::filter::FilterField;
use crate::types::pagination::PageResponse;
use crate::types::sorting::SortField;

use super::row::TableRow;

/// Generic CRUD repository over one table.
///
/// Implemented once, generically, for every [`TableRow`]; entity screens
/// differ only in the row type they instantiate it with.
#[async_trait]
pub trait Repository<T: TableRow>: Send + Sync + 'static {
    /// One page of rows for a list screen's parameters.
    async fn list(&self, params: &FetchParams) -> AppResult<PageResponse<T>>;

    /// Every row matching `filters`, ordered by `order` or the row's default.
    async fn find_where(
        &self,
        filters: &[FilterField],
        order: Option<SortField>,
    ) -> AppResult<Vec<T>>;

    /// Find a row by its primary key.
    async fn find_by_id(&self, id: T::Id) -> AppResult<Option<T>>;

    /// Find a row by its primary key or fail with `NotFound`.
    async fn get(&self, id: T::Id) -> AppResult<T> {
        self.find_by_id(id).await?.ok_or_else(|| {
            crate::error::AppError::not_found(format!("{} {} not found", T::TABLE, id))
        })
    }

    /// Validate and insert a row, returning it as stored.
    async fn insert(&self, new: &T::New) -> AppResult<T>;

    /// Apply a partial update and return the updated row.
    async fn update(&self, id: T::Id, patch: &T::Patch) -> AppResult<T>;

    /// Delete a row by primary key. Returns `true` if a row was removed.
    async fn delete(&self, id: T::Id) -> AppResult<bool>;

    /// Delete every row matching `filters`. Returns how many were removed.
    async fn delete_where(&self, filters: &[FilterField]) -> AppResult<u64>;

    /// Count rows matching `filters`.
    async fn count(&self, filters: &[FilterField]) -> AppResult<u64>;
}
