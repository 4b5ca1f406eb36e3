//! Purchase-order tracker.

use std::sync::Arc;

use erp_core::error::AppError;
use erp_core::result::AppResult;
use erp_core::traits::QueryBackend;
use erp_core::types::PurchaseOrderId;
use erp_entity::operations::{PurchaseOrder, PurchaseOrderPatch};

use crate::context::RequestContext;
use crate::entity::EntityService;

/// Lists tracked purchase orders and records tracking codes.
#[derive(Debug, Clone)]
pub struct PurchaseOrderTracker {
    orders: EntityService<PurchaseOrder>,
}

impl PurchaseOrderTracker {
    /// Creates a new tracker.
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            orders: EntityService::new(backend),
        }
    }

    /// Every tracked order, newest first.
    pub async fn list(&self) -> AppResult<Vec<PurchaseOrder>> {
        self.orders.all(None).await
    }

    /// Sets the carrier tracking code of an order.
    pub async fn update_tracking_code(
        &self,
        ctx: &RequestContext,
        id: PurchaseOrderId,
        code: &str,
    ) -> AppResult<PurchaseOrder> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::validation("Tracking code is required"));
        }
        let patch = PurchaseOrderPatch {
            tracking_code: Some(code.to_string()),
            ..PurchaseOrderPatch::default()
        };
        self.orders.update(ctx, id, &patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erp_core::error::ErrorKind;
    use erp_database::MemoryBackend;
    use serde_json::json;

    use crate::context::test_context as ctx;

    async fn seeded() -> Arc<MemoryBackend> {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .seed(
                "purchase_orders",
                vec![
                    json!({"id": 1, "order_date": "2024-01-10T09:00:00Z", "status": "shipped", "total_amount": 120.0, "tracking_code": null}),
                    json!({"id": 2, "order_date": "2024-03-02T09:00:00Z", "status": "pending", "total_amount": 80.0, "tracking_code": null}),
                ],
            )
            .await;
        backend
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let tracker = PurchaseOrderTracker::new(seeded().await);
        let ids: Vec<i64> = tracker
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|o| o.id.value())
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_update_tracking_code() {
        let tracker = PurchaseOrderTracker::new(seeded().await);
        let order = tracker
            .update_tracking_code(&ctx(), PurchaseOrderId::new(1), " BR123456789 ")
            .await
            .expect("update");
        assert_eq!(order.tracking_code.as_deref(), Some("BR123456789"));
        assert_eq!(order.status, "shipped");

        let err = tracker
            .update_tracking_code(&ctx(), PurchaseOrderId::new(1), "")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = tracker
            .update_tracking_code(&ctx(), PurchaseOrderId::new(9), "X1")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
