//! # erp-service
//!
//! Screen-level logic of the ERP console. Each service wraps one or more
//! table repositories and implements what a screen does: list fetching
//! with page/sort/filter state, atomic order creation, product images,
//! the finance dialogs and the dashboard summary.
//!
//! Services take their backend and storage as `Arc`s at construction and
//! are cheap to clone.

pub mod catalog;
pub mod context;
pub mod dashboard;
pub mod entity;
pub mod fetch;
pub mod finance;
pub mod operations;
pub mod order;
pub mod screens;
pub mod services;

pub use catalog::{CarrierService, ImageUpload, ProductService};
pub use context::RequestContext;
pub use dashboard::{DashboardService, DashboardSummary};
pub use entity::EntityService;
pub use fetch::{FetchState, ListFetcher};
pub use finance::{FinanceService, NameCatalog};
pub use operations::PurchaseOrderTracker;
pub use order::{CreateOrderRequest, OrderDetail, OrderLineRequest, OrderService};
pub use screens::{ScreenDefinition, ScreenKind, ScreenRegistry};
pub use services::ConsoleServices;
