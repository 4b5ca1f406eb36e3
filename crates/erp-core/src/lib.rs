//! # erp-core
//!
//! Core crate for the ERP console. Contains the backend contracts
//! (query, auth, object storage), configuration schemas, typed
//! identifiers, fetch/filter/sort/pagination types, auth state events,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other ERP crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
