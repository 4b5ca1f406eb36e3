//! Customer complaint row (`complaints`).

use chrono::{DateTime, Utc};
use erp_core::traits::TableRow;
use erp_core::types::{ComplaintId, CustomerId, OrderId, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A complaint filed by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    /// Unique identifier.
    pub id: ComplaintId,
    /// Complaining customer.
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// Order concerned.
    #[serde(default)]
    pub order_id: Option<OrderId>,
    /// When the complaint was filed.
    #[serde(default)]
    pub complaint_date: Option<DateTime<Utc>>,
    /// Handling status.
    pub status: String,
    /// Category (delivery, quality, ...).
    #[serde(default)]
    pub category: Option<String>,
    /// Priority (low, medium, high).
    #[serde(default)]
    pub priority: Option<String>,
}

impl TableRow for Complaint {
    const TABLE: &'static str = "complaints";
    type Id = ComplaintId;
    type New = NewComplaint;
    type Patch = ComplaintPatch;

    fn default_order() -> Option<SortField> {
        Some(SortField::desc("complaint_date"))
    }

    fn id(&self) -> ComplaintId {
        self.id
    }
}

/// Data required to file a complaint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewComplaint {
    /// Complaining customer.
    pub customer_id: CustomerId,
    /// Order concerned.
    #[serde(default)]
    pub order_id: Option<OrderId>,
    /// When the complaint was filed.
    pub complaint_date: DateTime<Utc>,
    /// Handling status.
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    /// Category.
    #[serde(default)]
    pub category: Option<String>,
    /// Priority.
    #[serde(default)]
    pub priority: Option<String>,
}

/// Editable fields of a complaint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplaintPatch {
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// New priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}
