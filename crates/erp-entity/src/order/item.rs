//! Order line items (`itens_pedido`).

use erp_core::traits::TableRow;
use erp_core::types::{Embed, OrderId, OrderItemId, ProductId, Selection, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::display::{NameRef, name_or_placeholder};

/// One line of an order, with the product name embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Unique item identifier.
    pub id: OrderItemId,
    /// Owning order.
    #[serde(rename = "pedido_id", default)]
    pub order_id: Option<OrderId>,
    /// Ordered product.
    #[serde(rename = "produto_id", default)]
    pub product_id: Option<ProductId>,
    /// Ordered quantity.
    #[serde(rename = "quantidade")]
    pub quantity: i64,
    /// Price per unit at order time.
    #[serde(rename = "preco_unitario")]
    pub unit_price: f64,
    /// Embedded product name.
    #[serde(rename = "produto", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<NameRef>,
}

impl OrderItem {
    /// Product name or the placeholder when the product is gone.
    pub fn product_name(&self) -> &str {
        name_or_placeholder(self.product.as_ref())
    }

    /// `quantity * unit_price`.
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

impl TableRow for OrderItem {
    const TABLE: &'static str = "itens_pedido";
    type Id = OrderItemId;
    type New = NewOrderItem;
    type Patch = OrderItemPatch;

    fn selection() -> Selection {
        Selection::all().with_embed(Embed::new("produto", "produtos", "produto_id", &["nome"]))
    }

    fn default_order() -> Option<SortField> {
        Some(SortField::asc("id"))
    }

    fn id(&self) -> OrderItemId {
        self.id
    }
}

/// A line item as entered on the add-order form. The owning order is set
/// when the order is stored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrderItem {
    /// Ordered product.
    #[serde(rename = "produto_id")]
    pub product_id: ProductId,
    /// Ordered quantity.
    #[serde(rename = "quantidade")]
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,
    /// Price per unit.
    #[serde(rename = "preco_unitario")]
    #[validate(range(min = 0.0, message = "Unit price cannot be negative"))]
    pub unit_price: f64,
}

impl NewOrderItem {
    /// `quantity * unit_price`.
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Editable fields of a line item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemPatch {
    /// New quantity.
    #[serde(rename = "quantidade", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// New unit price.
    #[serde(rename = "preco_unitario", default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

/// Sum of `quantity * unit_price` over all lines.
pub fn order_total(items: &[NewOrderItem]) -> f64 {
    items.iter().map(NewOrderItem::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_total() {
        let items = vec![
            NewOrderItem {
                product_id: ProductId::new(1),
                quantity: 2,
                unit_price: 10.0,
            },
            NewOrderItem {
                product_id: ProductId::new(2),
                quantity: 3,
                unit_price: 2.5,
            },
        ];
        assert_eq!(order_total(&items), 27.5);
        assert_eq!(order_total(&[]), 0.0);
    }

    #[test]
    fn test_item_product_name_placeholder() {
        let row = json!({
            "id": 5,
            "pedido_id": 1,
            "produto_id": 9,
            "quantidade": 1,
            "preco_unitario": 3.0,
            "produto": null
        });
        let item: OrderItem = serde_json::from_value(row).expect("deserialize");
        assert_eq!(item.product_name(), "N/A");
    }

    #[test]
    fn test_selection_embeds_product_name() {
        assert_eq!(
            OrderItem::selection().to_rest(),
            "*,produto:produtos!produto_id(nome)"
        );
    }
}
