//! List query parameter extractor.
//!
//! `?page=1&page_size=25&sort=data_pedido&order=desc&filter.status=pend`
//! becomes a [`FetchParams`]. Pages are 0-based, `page_size` defaults to
//! the console default and is capped at the configured maximum.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use erp_core::config::ConsoleConfig;
use erp_core::error::AppError;
use erp_core::result::AppResult;
use erp_core::types::query::ensure_identifier;
use erp_core::types::{FetchParams, SortDirection};

use crate::error::ApiError;
use crate::state::AppState;

/// Prefix of filter keys in the query string.
const FILTER_PREFIX: &str = "filter.";

/// Fetch parameters parsed from the query string.
#[derive(Debug, Clone)]
pub struct ListParams(pub FetchParams);

/// Build fetch parameters from raw query pairs.
pub fn parse_list_params(
    query: &HashMap<String, String>,
    console: &ConsoleConfig,
) -> AppResult<FetchParams> {
    let page = parse_number(query, "page")?.unwrap_or(0);
    let page_size = match parse_number(query, "page_size")? {
        Some(0) => return Err(AppError::validation("page_size must be greater than zero")),
        Some(size) => size.min(console.max_page_size),
        None => console.default_page_size,
    };

    let mut params = FetchParams::new(page_size).at_page(page);

    if let Some(column) = query.get("sort").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        ensure_identifier(column)?;
        let order = match query.get("order") {
            Some(raw) => raw.parse::<SortDirection>().map_err(AppError::validation)?,
            None => SortDirection::Asc,
        };
        params = params.sorted_by(column, order);
    }

    for (key, pattern) in query {
        if let Some(column) = key.strip_prefix(FILTER_PREFIX) {
            ensure_identifier(column)?;
            params = params.with_filter(column, pattern.clone());
        }
    }

    Ok(params)
}

fn parse_number(query: &HashMap<String, String>, key: &str) -> AppResult<Option<u64>> {
    query
        .get(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| AppError::validation(format!("{key} must be a non-negative integer")))
        })
        .transpose()
}

impl FromRequestParts<AppState> for ListParams {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid query string: {e}")))?;
        Ok(ListParams(parse_list_params(&query, &state.config.console)?))
    }
}
