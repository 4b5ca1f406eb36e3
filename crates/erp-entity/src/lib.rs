//! # erp-entity
//!
//! Row models for the hosted ERP schema. Every struct in this crate
//! mirrors a table row (column names kept through `#[serde(rename)]`
//! where the Rust name differs), together with the payloads accepted on
//! insert and update. Each row type implements
//! [`erp_core::traits::TableRow`], which is all the generic repository
//! needs to serve it.

pub mod display;
pub mod finance;
pub mod operations;
pub mod order;
pub mod partner;
pub mod product;

pub use display::{NOT_AVAILABLE, NameRef, format_currency, name_or_placeholder};
