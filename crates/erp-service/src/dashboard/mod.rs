//! Dashboard.

pub mod summary;

pub use summary::{DashboardService, DashboardSummary};
