//! Object storage provider implementations.

pub mod local;
pub mod rest;

pub use local::LocalStorageProvider;
pub use rest::RestObjectStorage;

use erp_core::error::AppError;
use erp_core::result::AppResult;

/// Normalize an object path and reject anything that could escape the
/// bucket.
pub(crate) fn clean_object_path(path: &str) -> AppResult<String> {
    let clean = path.trim().trim_start_matches('/');
    if clean.is_empty() {
        return Err(AppError::validation("Object path is empty"));
    }
    if clean
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\'))
    {
        return Err(AppError::validation(format!("Invalid object path: {path}")));
    }
    Ok(clean.to_string())
}
