//! Customer row (`customers`).

use erp_core::traits::TableRow;
use erp_core::types::{CustomerId, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier.
    pub id: CustomerId,
    /// Full name.
    pub name: String,
    /// E-mail address.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

impl TableRow for Customer {
    const TABLE: &'static str = "customers";
    type Id = CustomerId;
    type New = NewCustomer;
    type Patch = CustomerPatch;

    fn default_order() -> Option<SortField> {
        Some(SortField::asc("name"))
    }

    fn id(&self) -> CustomerId {
        self.id
    }
}

/// Data required to create a customer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCustomer {
    /// Full name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// E-mail address.
    #[serde(default)]
    #[validate(email(message = "Invalid e-mail address"))]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Editable fields of a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerPatch {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New e-mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
