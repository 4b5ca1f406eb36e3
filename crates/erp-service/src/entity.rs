//! Generic CRUD screen service.
//!
//! Most screens are a table plus its default page, sort and filters.
//! [`EntityService`] provides list/get/create/update/delete for any
//! [`TableRow`] on top of [`TableRepository`], logging every change with
//! the acting user.

use std::sync::Arc;

use tracing::info;

use erp_core::result::AppResult;
use erp_core::traits::{QueryBackend, Repository, TableRow};
use erp_core::types::{FetchParams, FilterField, PageResponse, SortField};
use erp_database::TableRepository;

use crate::context::RequestContext;

/// CRUD over one table.
pub struct EntityService<T> {
    repo: TableRepository<T>,
}

impl<T> Clone for EntityService<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<T: TableRow> std::fmt::Debug for EntityService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityService")
            .field("table", &T::TABLE)
            .finish()
    }
}

impl<T: TableRow> EntityService<T> {
    /// Creates a service reading and writing through `backend`.
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            repo: TableRepository::new(backend),
        }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &TableRepository<T> {
        &self.repo
    }

    /// One page for a list screen.
    pub async fn list(&self, params: &FetchParams) -> AppResult<PageResponse<T>> {
        self.repo.list(params).await
    }

    /// Every row, in the table's default order or `order`.
    pub async fn all(&self, order: Option<SortField>) -> AppResult<Vec<T>> {
        self.repo.find_where(&[], order).await
    }

    /// Rows matching `filters`.
    pub async fn find_where(&self, filters: &[FilterField]) -> AppResult<Vec<T>> {
        self.repo.find_where(filters, None).await
    }

    /// One row or `NotFound`.
    pub async fn get(&self, id: T::Id) -> AppResult<T> {
        self.repo.get(id).await
    }

    /// One row if it exists.
    pub async fn find(&self, id: T::Id) -> AppResult<Option<T>> {
        self.repo.find_by_id(id).await
    }

    /// Validate and insert a row.
    pub async fn create(&self, ctx: &RequestContext, new: &T::New) -> AppResult<T> {
        let row = self.repo.insert(new).await?;
        info!(
            table = T::TABLE,
            id = %row.id(),
            user_id = %ctx.user_id(),
            "Row created"
        );
        Ok(row)
    }

    /// Apply a partial update.
    pub async fn update(&self, ctx: &RequestContext, id: T::Id, patch: &T::Patch) -> AppResult<T> {
        let row = self.repo.update(id, patch).await?;
        info!(table = T::TABLE, id = %id, user_id = %ctx.user_id(), "Row updated");
        Ok(row)
    }

    /// Delete a row; `NotFound` when it does not exist.
    pub async fn delete(&self, ctx: &RequestContext, id: T::Id) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(erp_core::AppError::not_found(format!(
                "{} {id} not found",
                T::TABLE
            )));
        }
        info!(table = T::TABLE, id = %id, user_id = %ctx.user_id(), "Row deleted");
        Ok(())
    }
}
