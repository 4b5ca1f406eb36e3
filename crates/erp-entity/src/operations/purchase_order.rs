//! Tracked purchase order row (`purchase_orders`).

use chrono::{DateTime, Utc};
use erp_core::traits::TableRow;
use erp_core::types::{PurchaseOrderId, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A purchase order followed on the tracker screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Unique identifier.
    pub id: PurchaseOrderId,
    /// When the order was placed.
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    /// Delivery status.
    pub status: String,
    /// Order amount.
    pub total_amount: f64,
    /// Carrier tracking code, once shipped.
    #[serde(default)]
    pub tracking_code: Option<String>,
}

impl TableRow for PurchaseOrder {
    const TABLE: &'static str = "purchase_orders";
    type Id = PurchaseOrderId;
    type New = NewPurchaseOrder;
    type Patch = PurchaseOrderPatch;

    fn default_order() -> Option<SortField> {
        Some(SortField::desc("order_date"))
    }

    fn id(&self) -> PurchaseOrderId {
        self.id
    }
}

/// Data required to start tracking a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPurchaseOrder {
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
    /// Delivery status.
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    /// Order amount.
    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub total_amount: f64,
    /// Tracking code.
    #[serde(default)]
    pub tracking_code: Option<String>,
}

/// Editable fields of a tracked purchase order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseOrderPatch {
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// New tracking code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_code: Option<String>,
}
