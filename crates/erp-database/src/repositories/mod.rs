//! Repository implementations backed by a [`QueryBackend`].
//!
//! [`QueryBackend`]: erp_core::traits::QueryBackend

pub mod table;

pub use table::TableRepository;
