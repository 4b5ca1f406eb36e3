//! Supplier row (`fornecedores`).

use erp_core::traits::TableRow;
use erp_core::types::{SortField, SupplierId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A supplier goods are ordered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique supplier identifier.
    pub id: SupplierId,
    /// Supplier name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Contact (person, phone or e-mail).
    #[serde(rename = "contato", default)]
    pub contact: Option<String>,
}

impl TableRow for Supplier {
    const TABLE: &'static str = "fornecedores";
    type Id = SupplierId;
    type New = NewSupplier;
    type Patch = SupplierPatch;

    fn default_order() -> Option<SortField> {
        Some(SortField::asc("nome"))
    }

    fn id(&self) -> SupplierId {
        self.id
    }
}

/// Data required to create a supplier.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewSupplier {
    /// Supplier name.
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Contact.
    #[serde(rename = "contato", default)]
    pub contact: Option<String>,
}

/// Editable fields of a supplier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierPatch {
    /// New name.
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New contact.
    #[serde(rename = "contato", default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}
