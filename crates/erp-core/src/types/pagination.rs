//! Pagination types for list queries.
//!
//! Pages are 0-based. A page is turned into an inclusive row window
//! `[page * size, (page + 1) * size - 1]`, which is what the hosted data
//! API's `Range` header and the SQL `OFFSET`/`LIMIT` pair both express.

use serde::{Deserialize, Serialize};

/// Inclusive row window requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    /// Index of the first row (0-based).
    pub from: u64,
    /// Index of the last row (inclusive).
    pub to: u64,
}

impl RowRange {
    /// Window for a 0-based page of the given size. `page_size` is
    /// treated as at least 1.
    pub fn for_page(page: u64, page_size: u64) -> Self {
        let size = page_size.max(1);
        let from = page.saturating_mul(size);
        Self {
            from,
            to: from.saturating_add(size - 1),
        }
    }

    /// SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        self.from
    }

    /// SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.to - self.from + 1
    }

    /// `Range` header value (`from-to`).
    pub fn header_value(&self) -> String {
        format!("{}-{}", self.from, self.to)
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T: Serialize> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (0-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
    /// Whether there is a previous page.
    pub has_previous: bool,
}

impl<T: Serialize> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, page: u64, page_size: u64, total_items: u64) -> Self {
        let size = page_size.max(1);
        let total_pages = total_items.div_ceil(size);
        Self {
            items,
            page,
            page_size: size,
            total_items,
            total_pages,
            has_next: page + 1 < total_pages,
            has_previous: page > 0,
        }
    }

    /// Transform the items while keeping the page metadata.
    pub fn map<U: Serialize>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}
