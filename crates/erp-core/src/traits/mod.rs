//! Core traits defined in `erp-core` and implemented by other crates.

pub mod auth;
pub mod backend;
pub mod repository;
pub mod row;
pub mod storage;

pub use auth::{AccessTokenSource, AuthBackend};
pub use backend::QueryBackend;
pub use repository::Repository;
pub use row::TableRow;
pub use storage::{ObjectStorage, StoredObject};
