//! Fetch parameters of a list screen and the partial updates applied to them.
//!
//! A list screen owns exactly one [`FetchParams`] value. It changes only by
//! merging a [`FetchParamsPatch`] into it: fields present in the patch
//! replace the current ones, absent fields are kept. The `filters` map is
//! replaced as a whole (shallow merge), so a patch that wants to keep the
//! other filters must start from the current map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

use super::filter::FilterField;
use super::pagination::RowRange;
use super::sorting::{SortDirection, SortField};

/// Page, sort and filter state of one list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchParams {
    /// 0-based page index.
    pub page: u64,
    /// Rows per page, always greater than zero.
    pub page_size: u64,
    /// Column to order by; backend default order when `None`.
    pub sort_column: Option<String>,
    /// Direction applied to `sort_column`.
    pub sort_order: SortDirection,
    /// Column name to substring pattern. Empty patterns are ignored.
    pub filters: BTreeMap<String, String>,
}

impl FetchParams {
    /// First page of the given size, unsorted and unfiltered.
    pub fn new(page_size: u64) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            sort_column: None,
            sort_order: SortDirection::Asc,
            filters: BTreeMap::new(),
        }
    }

    /// Set the sort column and direction.
    pub fn sorted_by(mut self, column: impl Into<String>, order: SortDirection) -> Self {
        self.sort_column = Some(column.into());
        self.sort_order = order;
        self
    }

    /// Add a filter entry.
    pub fn with_filter(mut self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filters.insert(column.into(), pattern.into());
        self
    }

    /// Set the page index.
    pub fn at_page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    /// Merge a partial update into a new value.
    ///
    /// Returns a validation error when the patch would set `page_size` to 0.
    pub fn merged(&self, patch: FetchParamsPatch) -> AppResult<Self> {
        if patch.page_size == Some(0) {
            return Err(AppError::validation("page_size must be greater than zero"));
        }
        Ok(Self {
            page: patch.page.unwrap_or(self.page),
            page_size: patch.page_size.unwrap_or(self.page_size),
            sort_column: patch.sort_column.unwrap_or_else(|| self.sort_column.clone()),
            sort_order: patch.sort_order.unwrap_or(self.sort_order),
            filters: patch.filters.unwrap_or_else(|| self.filters.clone()),
        })
    }

    /// Row window of the current page.
    pub fn range(&self) -> RowRange {
        RowRange::for_page(self.page, self.page_size)
    }

    /// Substring filters for every non-empty entry, in column order.
    pub fn active_filters(&self) -> Vec<FilterField> {
        self.filters
            .iter()
            .filter(|(_, pattern)| !pattern.is_empty())
            .map(|(column, pattern)| FilterField::contains(column.as_str(), pattern))
            .collect()
    }

    /// Explicit sort, if any.
    pub fn sort(&self) -> Option<SortField> {
        self.sort_column
            .as_ref()
            .map(|column| SortField::new(column.clone(), self.sort_order))
    }
}

/// Partial [`FetchParams`]. `None` leaves the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchParamsPatch {
    /// New page index.
    #[serde(default)]
    pub page: Option<u64>,
    /// New page size.
    #[serde(default)]
    pub page_size: Option<u64>,
    /// New sort column; `Some(None)` clears it.
    #[serde(default)]
    pub sort_column: Option<Option<String>>,
    /// New sort direction.
    #[serde(default)]
    pub sort_order: Option<SortDirection>,
    /// Replacement filter map.
    #[serde(default)]
    pub filters: Option<BTreeMap<String, String>>,
}

impl FetchParamsPatch {
    /// Move to another page.
    pub fn page(page: u64) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Change the page size and go back to the first page.
    pub fn page_size(page_size: u64) -> Self {
        Self {
            page: Some(0),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    /// Order by `column` in `order`.
    pub fn sort(column: impl Into<String>, order: SortDirection) -> Self {
        Self {
            sort_column: Some(Some(column.into())),
            sort_order: Some(order),
            ..Self::default()
        }
    }

    /// Replace the filter map.
    pub fn filters(filters: BTreeMap<String, String>) -> Self {
        Self {
            filters: Some(filters),
            ..Self::default()
        }
    }

    /// Set one filter on top of the current ones and go back to the first page.
    pub fn filter_changed(
        current: &FetchParams,
        column: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        let mut filters = current.filters.clone();
        filters.insert(column.into(), pattern.into());
        Self {
            page: Some(0),
            filters: Some(filters),
            ..Self::default()
        }
    }

    /// Flip the direction when `column` is already the sort column,
    /// otherwise sort ascending by it.
    pub fn toggle_sort(current: &FetchParams, column: &str) -> Self {
        let order = if current.sort_column.as_deref() == Some(column) {
            current.sort_order.toggled()
        } else {
            SortDirection::Asc
        };
        Self::sort(column, order)
    }
}

/// Anything that can produce a patch from the current parameters.
///
/// Implemented by [`FetchParamsPatch`] itself (used as-is) and by every
/// `FnOnce(&FetchParams) -> FetchParamsPatch`, which receives the state
/// current at the moment the update is applied.
pub trait ParamsUpdate: Send {
    /// Produce the patch to merge.
    fn resolve(self, current: &FetchParams) -> FetchParamsPatch;
}

impl ParamsUpdate for FetchParamsPatch {
    fn resolve(self, _current: &FetchParams) -> FetchParamsPatch {
        self
    }
}

impl<F> ParamsUpdate for F
where
    F: FnOnce(&FetchParams) -> FetchParamsPatch + Send,
{
    fn resolve(self, current: &FetchParams) -> FetchParamsPatch {
        self(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders_defaults() -> FetchParams {
        FetchParams::new(10)
            .sorted_by("data_pedido", SortDirection::Desc)
            .with_filter("status", "")
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let current = orders_defaults().at_page(3);
        let next = current.merged(FetchParamsPatch::page(4)).expect("merge");
        assert_eq!(next.page, 4);
        assert_eq!(next.page_size, 10);
        assert_eq!(next.sort_column.as_deref(), Some("data_pedido"));
        assert_eq!(next.sort_order, SortDirection::Desc);
        assert_eq!(next.filters, current.filters);
    }

    #[test]
    fn test_merge_rejects_zero_page_size() {
        let err = orders_defaults()
            .merged(FetchParamsPatch::page_size(0))
            .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_filter_change_resets_page_and_keeps_other_filters() {
        let current = orders_defaults()
            .with_filter("fornecedor_id", "4")
            .at_page(2);
        let patch = FetchParamsPatch::filter_changed(&current, "status", "pend");
        let next = current.merged(patch).expect("merge");
        assert_eq!(next.page, 0);
        assert_eq!(next.filters.get("status").map(String::as_str), Some("pend"));
        assert_eq!(
            next.filters.get("fornecedor_id").map(String::as_str),
            Some("4")
        );
    }

    #[test]
    fn test_closure_update_reads_current_state() {
        let current = orders_defaults();
        let toggle = |p: &FetchParams| FetchParamsPatch::toggle_sort(p, "data_pedido");
        let next = current.merged(toggle.resolve(&current)).expect("merge");
        assert_eq!(next.sort_order, SortDirection::Asc);
        let again = next.merged(toggle.resolve(&next)).expect("merge");
        assert_eq!(again.sort_order, SortDirection::Desc);
    }

    #[test]
    fn test_active_filters_skip_empty_values() {
        let params = orders_defaults().with_filter("fornecedor_id", "12");
        let filters = params.active_filters();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].field, "fornecedor_id");
    }

    #[test]
    fn test_range_follows_page() {
        let params = orders_defaults().at_page(1);
        assert_eq!(params.range(), RowRange { from: 10, to: 19 });
    }
}
