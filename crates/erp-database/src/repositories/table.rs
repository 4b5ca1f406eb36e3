//! Generic table repository.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use erp_core::error::{AppError, ErrorKind};
use erp_core::result::AppResult;
use erp_core::traits::{QueryBackend, Repository, TableRow};
use erp_core::types::{
    FetchParams, FilterField, ListQuery, PageResponse, RowRange, SortField,
};

/// [`Repository`] for any [`TableRow`], delegating to a [`QueryBackend`].
pub struct TableRepository<T> {
    backend: Arc<dyn QueryBackend>,
    _row: PhantomData<fn() -> T>,
}

impl<T> Clone for TableRepository<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            _row: PhantomData,
        }
    }
}

impl<T: TableRow> fmt::Debug for TableRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableRepository")
            .field("table", &T::TABLE)
            .field("backend", &self.backend.backend_type())
            .finish()
    }
}

impl<T: TableRow> TableRepository<T> {
    /// Create a repository over `backend`.
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            backend,
            _row: PhantomData,
        }
    }

    /// The backend this repository reads from.
    pub fn backend(&self) -> &Arc<dyn QueryBackend> {
        &self.backend
    }

    fn by_id(id: T::Id) -> Vec<FilterField> {
        vec![FilterField::eq("id", id)]
    }
}

/// Decode backend rows into `T`.
pub fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> AppResult<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Serialization,
                    format!("Unexpected row shape in \"{table}\": {e}"),
                    e,
                )
            })
        })
        .collect()
}

/// Serialize a payload into the JSON object sent to the backend.
pub fn encode_payload<P: Serialize>(payload: &P) -> AppResult<Value> {
    let value = serde_json::to_value(payload)?;
    if !value.is_object() {
        return Err(AppError::validation("Payload must serialize to an object"));
    }
    Ok(value)
}

/// Flatten validator output into one `field: message` line per problem.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut lines: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, problems)| {
            problems.iter().map(move |problem| {
                let message = problem
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| problem.code.to_string());
                format!("{field}: {message}")
            })
        })
        .collect();
    lines.sort();
    AppError::with_source(ErrorKind::Validation, lines.join("; "), errors)
}

#[async_trait]
impl<T: TableRow> Repository<T> for TableRepository<T> {
    async fn list(&self, params: &FetchParams) -> AppResult<PageResponse<T>> {
        let Some(query) =
            ListQuery::from_fetch_params(T::TABLE, T::selection(), params, T::default_order())
                .match_keys(T::key_columns(), params)
        else {
            return Ok(PageResponse::new(Vec::new(), params.page, params.page_size, 0));
        };
        let result = self.backend.select(&query).await?;
        let total = result.total_count.unwrap_or(result.rows.len() as u64);
        let items = decode_rows(T::TABLE, result.rows)?;
        Ok(PageResponse::new(items, params.page, params.page_size, total))
    }

    async fn find_where(
        &self,
        filters: &[FilterField],
        order: Option<SortField>,
    ) -> AppResult<Vec<T>> {
        let mut query = ListQuery::new(T::TABLE).select(T::selection());
        query.filters = filters.to_vec();
        if let Some(sort) = order.or_else(T::default_order) {
            query = query.order(sort);
        }
        let result = self.backend.select(&query).await?;
        decode_rows(T::TABLE, result.rows)
    }

    async fn find_by_id(&self, id: T::Id) -> AppResult<Option<T>> {
        let mut query = ListQuery::new(T::TABLE)
            .select(T::selection())
            .range(RowRange::for_page(0, 1));
        query.filters = Self::by_id(id);
        let result = self.backend.select(&query).await?;
        Ok(decode_rows(T::TABLE, result.rows)?.into_iter().next())
    }

    async fn insert(&self, new: &T::New) -> AppResult<T> {
        new.validate().map_err(validation_error)?;
        let stored = self
            .backend
            .insert(T::TABLE, vec![encode_payload(new)?])
            .await?;
        let row = stored.into_iter().next().ok_or_else(|| {
            AppError::database(format!("Insert into \"{}\" returned no row", T::TABLE))
        })?;
        let id = decode_rows::<T>(T::TABLE, vec![row])?
            .into_iter()
            .next()
            .map(|row| row.id())
            .ok_or_else(|| AppError::internal("Decoded row vanished"))?;
        // Re-read so embeds are populated.
        self.get(id).await
    }

    async fn update(&self, id: T::Id, patch: &T::Patch) -> AppResult<T> {
        let payload = encode_payload(patch)?;
        if payload.as_object().is_some_and(|m| m.is_empty()) {
            return self.get(id).await;
        }
        let updated = self
            .backend
            .update(T::TABLE, &Self::by_id(id), payload)
            .await?;
        if updated.is_empty() {
            return Err(AppError::not_found(format!("{} {} not found", T::TABLE, id)));
        }
        self.get(id).await
    }

    async fn delete(&self, id: T::Id) -> AppResult<bool> {
        Ok(self.backend.delete(T::TABLE, &Self::by_id(id)).await? > 0)
    }

    async fn delete_where(&self, filters: &[FilterField]) -> AppResult<u64> {
        self.backend.delete(T::TABLE, filters).await
    }

    async fn count(&self, filters: &[FilterField]) -> AppResult<u64> {
        let mut query = ListQuery::new(T::TABLE)
            .with_count()
            .range(RowRange::for_page(0, 1));
        query.filters = filters.to_vec();
        let result = self.backend.select(&query).await?;
        result.total_count.ok_or_else(|| {
            AppError::database(format!("No count returned for \"{}\"", T::TABLE))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use erp_core::types::{FetchParamsPatch, SortDirection};
    use erp_entity::finance::{Bank, BankAccount, NewBank};
    use erp_entity::order::{Order, OrderPatch, OrderStatus};
    use erp_core::types::{BankId, OrderId};
    use serde_json::json;

    fn order_row(day: u32, status: &str, total: f64) -> Value {
        json!({
            "data_pedido": format!("2024-03-{day:02}T12:00:00Z"),
            "status": status,
            "total": total,
            "fornecedor_id": 1,
            "meio_pagamento": "cash",
            "transportadora_id": 1,
        })
    }

    async fn seeded_orders(count: u32) -> (Arc<MemoryBackend>, TableRepository<Order>) {
        let memory = Arc::new(MemoryBackend::new());
        let rows = (1..=count)
            .map(|day| order_row(day, if day % 2 == 0 { "shipped" } else { "pending" }, day as f64))
            .collect();
        memory.seed("pedidos", rows).await;
        let backend: Arc<dyn QueryBackend> = memory.clone();
        (memory, TableRepository::new(backend))
    }

    #[tokio::test]
    async fn test_list_pages_and_counts() {
        let (_, repo) = seeded_orders(25).await;
        let params = FetchParams::new(10).at_page(2);
        let page = repo.list(&params).await.expect("list");
        assert_eq!(page.total_items, 25);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_list_uses_default_order_then_explicit_sort() {
        let (_, repo) = seeded_orders(3).await;
        let newest_first = repo.list(&FetchParams::new(10)).await.expect("list");
        assert_eq!(newest_first.items[0].id, OrderId::new(3));

        let params = FetchParams::new(10)
            .merged(FetchParamsPatch::sort("total", SortDirection::Asc))
            .expect("merge");
        let cheapest_first = repo.list(&params).await.expect("list");
        assert_eq!(cheapest_first.items[0].id, OrderId::new(1));
    }

    #[tokio::test]
    async fn test_list_filters_are_case_insensitive_substrings() {
        let (_, repo) = seeded_orders(6).await;
        let params = FetchParams::new(10).with_filter("status", "SHIP");
        let page = repo.list(&params).await.expect("list");
        assert_eq!(page.total_items, 3);
        assert!(page.items.iter().all(|o| o.status == "shipped"));
    }

    #[tokio::test]
    async fn test_insert_validates_before_touching_backend() {
        let memory = Arc::new(MemoryBackend::new());
        let backend: Arc<dyn QueryBackend> = memory.clone();
        let repo = TableRepository::<Bank>::new(backend);
        let err = repo
            .insert(&NewBank { name: String::new() })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "name: Name is required");
        assert!(memory.dump("bancos").await.is_empty());

        let bank = repo
            .insert(&NewBank { name: "Banco do Brasil".into() })
            .await
            .expect("insert");
        assert_eq!(bank.id, BankId::new(1));
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let (_, repo) = seeded_orders(1).await;
        let patch = OrderPatch {
            status: Some(OrderStatus::Delivered),
            ..Default::default()
        };
        let updated = repo.update(OrderId::new(1), &patch).await.expect("update");
        assert_eq!(updated.status, "delivered");

        let err = repo.update(OrderId::new(42), &patch).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_embedded_bank_name() {
        let memory = Arc::new(MemoryBackend::new());
        memory.seed("bancos", vec![json!({"nome": "Itaú"})]).await;
        memory
            .seed(
                "contas_bancarias",
                vec![json!({
                    "nome": "Operacional",
                    "banco_id": 1,
                    "numero_conta": "12345-6",
                    "tipo_conta": "corrente",
                })],
            )
            .await;
        let backend: Arc<dyn QueryBackend> = memory;
        let repo = TableRepository::<BankAccount>::new(backend);
        let accounts = repo.find_where(&[], None).await.expect("find");
        assert_eq!(accounts[0].bank_name(), "Itaú");
    }

    #[tokio::test]
    async fn test_count_and_delete_where() {
        let (_, repo) = seeded_orders(4).await;
        let shipped = [FilterField::eq("status", "shipped")];
        assert_eq!(repo.count(&shipped).await.expect("count"), 2);
        assert_eq!(repo.delete_where(&shipped).await.expect("delete"), 2);
        assert_eq!(repo.count(&[]).await.expect("count"), 2);
        assert!(!repo.delete(OrderId::new(2)).await.expect("delete"));
    }
}
