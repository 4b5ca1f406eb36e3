//! Sales return row (`sales_order_returns`).

use chrono::{DateTime, Utc};
use erp_core::traits::TableRow;
use erp_core::types::{OrderId, SalesReturnId, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A customer return against an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReturn {
    /// Unique identifier.
    pub id: SalesReturnId,
    /// Order being returned.
    #[serde(default)]
    pub order_id: Option<OrderId>,
    /// When the return was requested.
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,
    /// Processing status.
    pub status: String,
    /// Stated reason.
    #[serde(default)]
    pub reason: Option<String>,
    /// Amount refunded.
    #[serde(default)]
    pub refund_amount: Option<f64>,
}

impl TableRow for SalesReturn {
    const TABLE: &'static str = "sales_order_returns";
    type Id = SalesReturnId;
    type New = NewSalesReturn;
    type Patch = SalesReturnPatch;

    fn default_order() -> Option<SortField> {
        Some(SortField::desc("return_date"))
    }

    fn id(&self) -> SalesReturnId {
        self.id
    }
}

/// Data required to register a return.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewSalesReturn {
    /// Order being returned.
    pub order_id: OrderId,
    /// When the return was requested.
    pub return_date: DateTime<Utc>,
    /// Processing status.
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    /// Stated reason.
    #[serde(default)]
    pub reason: Option<String>,
    /// Amount refunded.
    #[serde(default)]
    pub refund_amount: Option<f64>,
}

/// Editable fields of a return.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesReturnPatch {
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// New refund amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<f64>,
}
