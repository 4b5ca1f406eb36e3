//! Carrier row (`carriers`).

use erp_core::traits::TableRow;
use erp_core::types::{CarrierId, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A carrier that delivers orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrier {
    /// Unique carrier identifier.
    pub id: CarrierId,
    /// Carrier name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Contact.
    #[serde(rename = "contato", default)]
    pub contact: Option<String>,
    /// Region the carrier serves.
    #[serde(rename = "area_servico", default)]
    pub service_area: Option<String>,
}

impl TableRow for Carrier {
    const TABLE: &'static str = "carriers";
    type Id = CarrierId;
    type New = NewCarrier;
    type Patch = CarrierPatch;

    fn default_order() -> Option<SortField> {
        Some(SortField::asc("nome"))
    }

    fn id(&self) -> CarrierId {
        self.id
    }
}

/// Data required to create a carrier.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCarrier {
    /// Carrier name.
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Contact.
    #[serde(rename = "contato", default)]
    pub contact: Option<String>,
    /// Region served.
    #[serde(rename = "area_servico", default)]
    pub service_area: Option<String>,
}

/// Editable fields of a carrier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CarrierPatch {
    /// New name.
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    /// New contact.
    #[serde(rename = "contato", default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// New service area.
    #[serde(rename = "area_servico", default, skip_serializing_if = "Option::is_none")]
    pub service_area: Option<String>,
}
