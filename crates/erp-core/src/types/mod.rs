//! Core type definitions used across the ERP workspace.

pub mod fetch;
pub mod filter;
pub mod id;
pub mod pagination;
pub mod query;
pub mod session;
pub mod sorting;

pub use fetch::{FetchParams, FetchParamsPatch, ParamsUpdate};
pub use filter::{FilterField, FilterOp, FilterValue};
pub use id::*;
pub use pagination::{PageResponse, RowRange};
pub use query::{
    Embed, ListQuery, ParentChildInsert, ParentChildResult, QueryResult, Selection,
    is_valid_identifier,
};
pub use session::{Session, SessionUser};
pub use sorting::{SortDirection, SortField};
