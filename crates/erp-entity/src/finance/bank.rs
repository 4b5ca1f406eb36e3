//! Name-only lookup tables: banks (`bancos`) and card networks
//! (`bandeiras_cartao`).

use erp_core::traits::TableRow;
use erp_core::types::{BankId, CardNetworkId, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Unique bank identifier.
    pub id: BankId,
    /// Bank name.
    #[serde(rename = "nome")]
    pub name: String,
}

impl TableRow for Bank {
    const TABLE: &'static str = "bancos";
    type Id = BankId;
    type New = NewBank;
    type Patch = BankPatch;

    fn default_order() -> Option<SortField> {
        Some(SortField::asc("nome"))
    }

    fn id(&self) -> BankId {
        self.id
    }
}

/// Data required to create a bank.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewBank {
    /// Bank name.
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

impl From<String> for NewBank {
    fn from(name: String) -> Self {
        Self { name }
    }
}

/// Editable fields of a bank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankPatch {
    /// New name.
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A card network (Visa, Mastercard, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardNetwork {
    /// Unique network identifier.
    pub id: CardNetworkId,
    /// Network name.
    #[serde(rename = "nome")]
    pub name: String,
}

impl TableRow for CardNetwork {
    const TABLE: &'static str = "bandeiras_cartao";
    type Id = CardNetworkId;
    type New = NewCardNetwork;
    type Patch = CardNetworkPatch;

    fn default_order() -> Option<SortField> {
        Some(SortField::asc("nome"))
    }

    fn id(&self) -> CardNetworkId {
        self.id
    }
}

/// Data required to create a card network.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCardNetwork {
    /// Network name.
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

impl From<String> for NewCardNetwork {
    fn from(name: String) -> Self {
        Self { name }
    }
}

/// Editable fields of a card network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardNetworkPatch {
    /// New name.
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
