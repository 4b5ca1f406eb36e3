//! All services of the console, built from one backend and one bucket.

use std::sync::Arc;

use erp_core::config::AppConfig;
use erp_core::traits::{ObjectStorage, QueryBackend};
use erp_entity::operations::{Complaint, InventoryMovement, MarketplaceQuestion, SalesReturn};
use erp_entity::partner::{Customer, Supplier};

use crate::catalog::{CarrierService, ProductService};
use crate::dashboard::DashboardService;
use crate::entity::EntityService;
use crate::finance::FinanceService;
use crate::operations::PurchaseOrderTracker;
use crate::order::OrderService;
use crate::screens::ScreenRegistry;

/// Every service the HTTP layer dispatches to.
#[derive(Debug, Clone)]
pub struct ConsoleServices {
    /// Navigation and mounted list screens.
    pub screens: Arc<ScreenRegistry>,
    /// Orders.
    pub orders: OrderService,
    /// Products.
    pub products: ProductService,
    /// Carriers.
    pub carriers: CarrierService,
    /// Suppliers.
    pub suppliers: EntityService<Supplier>,
    /// Customers.
    pub customers: EntityService<Customer>,
    /// Bank accounts, cards, banks and card networks.
    pub finance: FinanceService,
    /// Purchase-order tracker.
    pub tracker: PurchaseOrderTracker,
    /// Inventory movements.
    pub inventory: EntityService<InventoryMovement>,
    /// Sales returns.
    pub sales_returns: EntityService<SalesReturn>,
    /// Complaints.
    pub complaints: EntityService<Complaint>,
    /// Marketplace questions.
    pub marketplace_questions: EntityService<MarketplaceQuestion>,
    /// Dashboard summary.
    pub dashboard: DashboardService,
}

impl ConsoleServices {
    /// Builds every service over `backend` and `storage`.
    pub fn new(
        backend: Arc<dyn QueryBackend>,
        storage: Arc<dyn ObjectStorage>,
        config: &AppConfig,
    ) -> Self {
        Self {
            screens: Arc::new(ScreenRegistry::new(Arc::clone(&backend), &config.console)),
            orders: OrderService::new(Arc::clone(&backend)),
            products: ProductService::new(
                Arc::clone(&backend),
                storage,
                config.storage.max_image_bytes,
            ),
            carriers: CarrierService::new(Arc::clone(&backend)),
            suppliers: EntityService::new(Arc::clone(&backend)),
            customers: EntityService::new(Arc::clone(&backend)),
            finance: FinanceService::new(Arc::clone(&backend)),
            tracker: PurchaseOrderTracker::new(Arc::clone(&backend)),
            inventory: EntityService::new(Arc::clone(&backend)),
            sales_returns: EntityService::new(Arc::clone(&backend)),
            complaints: EntityService::new(Arc::clone(&backend)),
            marketplace_questions: EntityService::new(Arc::clone(&backend)),
            dashboard: DashboardService::new(backend),
        }
    }
}
