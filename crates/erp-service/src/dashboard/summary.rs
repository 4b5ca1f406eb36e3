//! Headline numbers on the dashboard, computed from the backend.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use erp_core::result::AppResult;
use erp_core::traits::{QueryBackend, Repository, TableRow};
use erp_database::TableRepository;
use erp_entity::format_currency;
use erp_entity::order::Order;
use erp_entity::partner::Customer;
use erp_entity::product::Product;

/// Counts and sales total shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Number of customers.
    pub customers: u64,
    /// Number of products.
    pub products: u64,
    /// Number of orders.
    pub orders: u64,
    /// Sum of all order totals.
    pub sales_total: f64,
    /// `sales_total` formatted for display.
    pub sales_total_display: String,
}

/// Computes the dashboard summary.
#[derive(Debug, Clone)]
pub struct DashboardService {
    backend: Arc<dyn QueryBackend>,
    customers: TableRepository<Customer>,
    products: TableRepository<Product>,
    orders: TableRepository<Order>,
}

impl DashboardService {
    /// Creates a new dashboard service.
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            customers: TableRepository::new(Arc::clone(&backend)),
            products: TableRepository::new(Arc::clone(&backend)),
            orders: TableRepository::new(Arc::clone(&backend)),
            backend,
        }
    }

    /// Runs the four reads concurrently; any failure fails the summary.
    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let (customers, products, orders, sales_total) = tokio::try_join!(
            self.customers.count(&[]),
            self.products.count(&[]),
            self.orders.count(&[]),
            self.sales_total(),
        )?;
        debug!(customers, products, orders, sales_total, "Dashboard summary computed");
        Ok(DashboardSummary {
            customers,
            products,
            orders,
            sales_total,
            sales_total_display: format_currency(sales_total),
        })
    }

    async fn sales_total(&self) -> AppResult<f64> {
        self.backend.sum(Order::TABLE, "total", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erp_core::error::ErrorKind;
    use erp_database::MemoryBackend;
    use serde_json::json;

    #[tokio::test]
    async fn test_summary_counts_and_total() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .seed(
                "customers",
                vec![json!({"name": "Ana"}), json!({"name": "Bruno"}), json!({"name": "Carla"})],
            )
            .await;
        backend
            .seed("produtos", vec![json!({"nome": "Parafuso", "preco": 0.5, "estoque": 1, "sku": "P"})])
            .await;
        backend
            .seed(
                "pedidos",
                vec![
                    json!({"status": "pending", "total": 100.25}),
                    json!({"status": "shipped", "total": 49.75}),
                    json!({"status": "cancelled", "total": null}),
                ],
            )
            .await;

        let summary = DashboardService::new(backend).summary().await.expect("summary");
        assert_eq!(summary.customers, 3);
        assert_eq!(summary.products, 1);
        assert_eq!(summary.orders, 3);
        assert_eq!(summary.sales_total, 150.0);
        assert_eq!(summary.sales_total_display, "R$ 150.00");
    }

    #[tokio::test]
    async fn test_sales_total_spans_several_batches() {
        let backend = Arc::new(MemoryBackend::new());
        let orders = (0..2_500)
            .map(|_| json!({"status": "delivered", "total": 2.0}))
            .collect();
        backend.seed("pedidos", orders).await;

        let summary = DashboardService::new(backend).summary().await.expect("summary");
        assert_eq!(summary.orders, 2_500);
        assert_eq!(summary.sales_total, 5_000.0);
    }

    #[tokio::test]
    async fn test_empty_backend_summary() {
        let summary = DashboardService::new(Arc::new(MemoryBackend::new()))
            .summary()
            .await
            .expect("summary");
        assert_eq!(summary.orders, 0);
        assert_eq!(summary.sales_total_display, "R$ 0.00");
    }

    #[tokio::test]
    async fn test_failing_read_fails_summary() {
        let backend = Arc::new(MemoryBackend::new());
        backend.fail_reads_from("customers").await;
        let err = DashboardService::new(backend).summary().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }
}
