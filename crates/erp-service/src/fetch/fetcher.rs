//! List fetcher: one backend query per parameter change.
//!
//! A fetcher owns the [`FetchParams`] of one list screen. Every call to
//! [`ListFetcher::update_fetch_params`] or [`ListFetcher::refetch`] issues
//! exactly one query built from the parameters current at that moment:
//! exact count, one case-insensitive substring filter per non-empty
//! entry (an exact id match on key columns), the explicit sort or the table's default order, and the page's
//! row window.
//!
//! Each query carries a generation number. When it completes, its result
//! is applied only if no later query has been issued since; a superseded
//! response is dropped, so slow requests never overwrite fresher state.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, warn};

use erp_core::result::AppResult;
use erp_core::traits::{QueryBackend, TableRow};
use erp_core::types::{FetchParams, ListQuery, ParamsUpdate, Selection, SortField};
use erp_database::repositories::table::decode_rows;

use super::state::FetchState;

/// Fetches pages of `T` from one table and publishes them as [`FetchState`].
pub struct ListFetcher<T> {
    backend: Arc<dyn QueryBackend>,
    table: String,
    selection: Selection,
    default_order: Option<SortField>,
    key_columns: &'static [&'static str],
    params: Mutex<FetchParams>,
    generation: AtomicU64,
    state: watch::Sender<FetchState<T>>,
}

impl<T> std::fmt::Debug for ListFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListFetcher")
            .field("table", &self.table)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

impl<T> ListFetcher<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create a fetcher over `table` selecting all columns. No query is
    /// issued until the first update or [`refetch`](Self::refetch).
    pub fn new(backend: Arc<dyn QueryBackend>, table: impl Into<String>, initial: FetchParams) -> Self {
        let (state, _) = watch::channel(FetchState::initial(initial.clone()));
        Self {
            backend,
            table: table.into(),
            selection: Selection::all(),
            default_order: None,
            key_columns: &[],
            params: Mutex::new(initial),
            generation: AtomicU64::new(0),
            state,
        }
    }

    /// Replace the selected columns and embeds.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Order applied when no sort column is set.
    pub fn with_default_order(mut self, order: Option<SortField>) -> Self {
        self.default_order = order;
        self
    }

    /// Columns whose filters match a whole id.
    pub fn with_key_columns(mut self, columns: &'static [&'static str]) -> Self {
        self.key_columns = columns;
        self
    }

    /// Table this fetcher reads.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Apply a partial update (a [`FetchParamsPatch`] or a closure over
    /// the current parameters) and fetch once with the result.
    ///
    /// A patch that would make the parameters invalid is rejected before
    /// anything is fetched.
    ///
    /// [`FetchParamsPatch`]: erp_core::types::FetchParamsPatch
    pub async fn update_fetch_params(&self, update: impl ParamsUpdate) -> AppResult<()> {
        let (generation, params) = {
            let mut current = self.lock_params();
            let next = current.merged(update.resolve(&current))?;
            *current = next.clone();
            (self.next_generation(), next)
        };
        self.fetch(generation, params).await;
        Ok(())
    }

    /// Fetch again with the current parameters.
    pub async fn refetch(&self) {
        let (generation, params) = {
            let current = self.lock_params();
            (self.next_generation(), current.clone())
        };
        self.fetch(generation, params).await;
    }

    /// Current parameters.
    pub fn fetch_params(&self) -> FetchParams {
        self.lock_params().clone()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    fn lock_params(&self) -> std::sync::MutexGuard<'_, FetchParams> {
        self.params
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn fetch(&self, generation: u64, params: FetchParams) {
        self.state.send_modify(|state| {
            state.loading = true;
            if self.is_latest(generation) {
                state.fetch_params = params.clone();
            }
        });

        let query = ListQuery::from_fetch_params(
            self.table.clone(),
            self.selection.clone(),
            &params,
            self.default_order.clone(),
        )
        .match_keys(self.key_columns, &params);

        let outcome = match query {
            Some(query) => {
                debug!(
                    table = %self.table,
                    page = params.page,
                    page_size = params.page_size,
                    filters = query.filters.len(),
                    generation,
                    "Fetching list"
                );
                self.backend.select(&query).await.and_then(|result| {
                    let total = result.total_count.unwrap_or(result.rows.len() as u64);
                    Ok((decode_rows::<T>(&self.table, result.rows)?, total))
                })
            }
            None => {
                debug!(table = %self.table, generation, "Id filter is not a number, no rows match");
                Ok((Vec::new(), 0))
            }
        };

        self.state.send_if_modified(|state| {
            if !self.is_latest(generation) {
                debug!(table = %self.table, generation, "Discarding superseded response");
                return false;
            }
            state.loading = false;
            state.fetch_params = params;
            match outcome {
                Ok((rows, total)) => {
                    state.data = rows;
                    state.total_count = total;
                    state.error = None;
                }
                Err(e) => {
                    warn!(table = %self.table, generation, error = %e, "List fetch failed");
                    state.error = Some(e.user_message().to_string());
                }
            }
            true
        });
    }
}

impl<T: TableRow> ListFetcher<T> {
    /// Fetcher over `T`'s table, selection and default order.
    pub fn for_rows(backend: Arc<dyn QueryBackend>, initial: FetchParams) -> Self {
        Self::new(backend, T::TABLE, initial)
            .with_selection(T::selection())
            .with_default_order(T::default_order())
            .with_key_columns(T::key_columns())
    }

    /// [`for_rows`](Self::for_rows) followed by the initial fetch.
    pub async fn mount(backend: Arc<dyn QueryBackend>, initial: FetchParams) -> Self {
        let fetcher = Self::for_rows(backend, initial);
        fetcher.refetch().await;
        fetcher
    }
}
