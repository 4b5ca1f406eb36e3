//! Query contract of the hosted relational backend.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::filter::FilterField;
use crate::types::pagination::RowRange;
use crate::types::query::{
    ListQuery, ParentChildInsert, ParentChildResult, QueryResult, Selection, ensure_identifier,
};
use crate::types::sorting::SortField;

/// Rows requested per round trip when a sum is computed from row pages.
pub const SUM_BATCH_SIZE: u64 = 1000;

/// Row-level CRUD against the backend's tables.
///
/// Implementations exist for the hosted REST data API, a direct Postgres
/// connection, and an in-process store. The trait is defined here in
/// `erp-core` and implemented in `erp-database`.
#[async_trait]
pub trait QueryBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "rest", "postgres", "memory").
    fn backend_type(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Run a read query.
    async fn select(&self, query: &ListQuery) -> AppResult<QueryResult>;

    /// Sum of the numeric `column` over the rows matching `filters`.
    /// Nulls and non-numeric values count as zero.
    ///
    /// The default reads the column in `id` order, one window at a time,
    /// until the exact row count is reached. It advances by the rows
    /// actually returned, so a server that caps its responses below
    /// [`SUM_BATCH_SIZE`] is still read to the end.
    async fn sum(&self, table: &str, column: &str, filters: &[FilterField]) -> AppResult<f64> {
        ensure_identifier(column)?;
        let selection = Selection {
            columns: vec![column.to_string()],
            embeds: Vec::new(),
        };
        let mut total = 0.0;
        let mut from = 0_u64;
        loop {
            let mut query = ListQuery::new(table)
                .select(selection.clone())
                .order(SortField::asc("id"))
                .range(RowRange {
                    from,
                    to: from + SUM_BATCH_SIZE - 1,
                })
                .with_count();
            for filter in filters {
                query = query.filter(filter.clone());
            }
            let page = self.select(&query).await?;
            total += page
                .rows
                .iter()
                .filter_map(|row| row.get(column).and_then(Value::as_f64))
                .sum::<f64>();
            from += page.rows.len() as u64;
            if page.rows.is_empty() || page.total_count.is_none_or(|count| from >= count) {
                return Ok(total);
            }
        }
    }

    /// Insert rows and return them as stored.
    async fn insert(&self, table: &str, rows: Vec<Value>) -> AppResult<Vec<Value>>;

    /// Apply `patch` to every row matching `filters`; return the updated rows.
    async fn update(&self, table: &str, filters: &[FilterField], patch: Value)
    -> AppResult<Vec<Value>>;

    /// Delete every row matching `filters`; return how many were removed.
    async fn delete(&self, table: &str, filters: &[FilterField]) -> AppResult<u64>;

    /// Insert a parent row and its children so that either all of them are
    /// stored or none are.
    async fn insert_with_children(&self, request: ParentChildInsert)
    -> AppResult<ParentChildResult>;
}
