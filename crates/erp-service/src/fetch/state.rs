//! Observable state of a list fetcher.

use serde::Serialize;

use erp_core::types::FetchParams;

/// What a list screen renders: the current page, its total, and whether
/// a request is in flight or the last one failed.
#[derive(Debug, Clone, Serialize)]
pub struct FetchState<T> {
    /// Rows of the current page.
    pub data: Vec<T>,
    /// Rows matching the filters across all pages.
    pub total_count: u64,
    /// A request is in flight.
    pub loading: bool,
    /// Message of the last failed request; cleared by the next success.
    pub error: Option<String>,
    /// Parameters of the most recent request.
    pub fetch_params: FetchParams,
}

impl<T> FetchState<T> {
    pub(crate) fn initial(fetch_params: FetchParams) -> Self {
        Self {
            data: Vec::new(),
            total_count: 0,
            loading: false,
            error: None,
            fetch_params,
        }
    }

    /// Number of pages at the current page size.
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.fetch_params.page_size.max(1))
    }
}
