//! Inventory movement row (`inventory_movements`).

use chrono::{DateTime, Utc};
use erp_core::traits::TableRow;
use erp_core::types::{Embed, InventoryMovementId, ProductId, Selection, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::display::{NameRef, name_or_placeholder};

/// A stock movement of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryMovement {
    /// Unique movement identifier.
    pub id: InventoryMovementId,
    /// Product moved.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Movement kind (`in`, `out`, `adjustment`, ...).
    pub movement_type: String,
    /// Units moved.
    pub quantity: i64,
    /// When the movement happened.
    #[serde(default)]
    pub movement_date: Option<DateTime<Utc>>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Embedded product name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<NameRef>,
}

impl InventoryMovement {
    /// Product name or the placeholder.
    pub fn product_name(&self) -> &str {
        name_or_placeholder(self.product.as_ref())
    }
}

impl TableRow for InventoryMovement {
    const TABLE: &'static str = "inventory_movements";
    type Id = InventoryMovementId;
    type New = NewInventoryMovement;
    type Patch = InventoryMovementPatch;

    fn selection() -> Selection {
        Selection::all().with_embed(Embed::new("product", "produtos", "product_id", &["nome"]))
    }

    fn default_order() -> Option<SortField> {
        Some(SortField::desc("movement_date"))
    }

    fn id(&self) -> InventoryMovementId {
        self.id
    }
}

/// Data required to record a movement.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewInventoryMovement {
    /// Product moved.
    pub product_id: ProductId,
    /// Movement kind.
    #[validate(length(min = 1, message = "Movement type is required"))]
    pub movement_type: String,
    /// Units moved.
    pub quantity: i64,
    /// When the movement happened.
    pub movement_date: DateTime<Utc>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Editable fields of a movement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryMovementPatch {
    /// New notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
