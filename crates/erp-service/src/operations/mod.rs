//! Operations screens. Inventory, returns, complaints and marketplace
//! questions are read-only lists served by the screen registry; only the
//! purchase-order tracker writes.

pub mod tracker;

pub use tracker::PurchaseOrderTracker;
