//! HTTP request handlers, one module per console area.

pub mod auth;
pub mod dashboard;
pub mod finance;
pub mod health;
pub mod operations;
pub mod orders;
pub mod partners;
pub mod products;
pub mod screens;

use validator::Validate;

use erp_core::result::AppResult;
use erp_database::repositories::table::validation_error;

/// Runs the body's validation rules.
pub(crate) fn validated<T: Validate>(body: T) -> AppResult<T> {
    body.validate().map_err(validation_error)?;
    Ok(body)
}
