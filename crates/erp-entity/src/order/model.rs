//! Order header row.

use chrono::{DateTime, Utc};
use erp_core::traits::TableRow;
use erp_core::types::{
    BankAccountId, CarrierId, CreditCardId, OrderId, SortField, SupplierId,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::payment::PaymentMethod;
use super::status::OrderStatus;

/// An order header in `pedidos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// When the order was placed.
    #[serde(rename = "data_pedido", default)]
    pub order_date: Option<DateTime<Utc>>,
    /// Status as stored; see [`OrderStatus`] for the known values.
    pub status: String,
    /// Order total.
    pub total: f64,
    /// Supplier the goods are bought from.
    #[serde(rename = "fornecedor_id", default)]
    pub supplier_id: Option<SupplierId>,
    /// Payment method as stored.
    #[serde(rename = "meio_pagamento", default)]
    pub payment_method: Option<String>,
    /// Card charged, for card payments.
    #[serde(rename = "cartao_credito_id", default)]
    pub credit_card_id: Option<CreditCardId>,
    /// Account debited, for bank transfers.
    #[serde(rename = "conta_bancaria_id", default)]
    pub bank_account_id: Option<BankAccountId>,
    /// Carrier delivering the order.
    #[serde(rename = "transportadora_id", default)]
    pub carrier_id: Option<CarrierId>,
}

impl Order {
    /// Parsed status, `None` for values outside the known vocabulary.
    pub fn status_kind(&self) -> Option<OrderStatus> {
        self.status.parse().ok()
    }
}

impl TableRow for Order {
    const TABLE: &'static str = "pedidos";
    type Id = OrderId;
    type New = NewOrder;
    type Patch = OrderPatch;

    fn default_order() -> Option<SortField> {
        Some(SortField::desc("data_pedido"))
    }

    fn key_columns() -> &'static [&'static str] {
        &["fornecedor_id", "transportadora_id"]
    }

    fn id(&self) -> OrderId {
        self.id
    }
}

/// Data required to create an order header.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrder {
    /// When the order was placed.
    #[serde(rename = "data_pedido")]
    pub order_date: DateTime<Utc>,
    /// Initial status.
    #[serde(default)]
    pub status: OrderStatus,
    /// Order total.
    #[validate(range(min = 0.0, message = "Total cannot be negative"))]
    pub total: f64,
    /// Supplier the goods are bought from.
    #[serde(rename = "fornecedor_id")]
    #[validate(required(message = "Supplier is required"))]
    pub supplier_id: Option<SupplierId>,
    /// Payment method.
    #[serde(rename = "meio_pagamento")]
    #[validate(required(message = "Payment method is required"))]
    pub payment_method: Option<PaymentMethod>,
    /// Card charged, for card payments.
    #[serde(rename = "cartao_credito_id", default)]
    pub credit_card_id: Option<CreditCardId>,
    /// Account debited, for bank transfers.
    #[serde(rename = "conta_bancaria_id", default)]
    pub bank_account_id: Option<BankAccountId>,
    /// Carrier delivering the order.
    #[serde(rename = "transportadora_id")]
    #[validate(required(message = "Carrier is required"))]
    pub carrier_id: Option<CarrierId>,
}

/// Editable fields of an order header.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderPatch {
    /// New order date.
    #[serde(rename = "data_pedido", default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<DateTime<Utc>>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    /// New total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Total cannot be negative"))]
    pub total: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_reads_backend_columns() {
        let row = json!({
            "id": 1,
            "data_pedido": "2024-03-01T10:00:00Z",
            "status": "shipped",
            "total": 150.5,
            "fornecedor_id": 3,
            "meio_pagamento": "cash",
            "cartao_credito_id": null,
            "conta_bancaria_id": null,
            "transportadora_id": 2
        });
        let order: Order = serde_json::from_value(row).expect("deserialize");
        assert_eq!(order.supplier_id, Some(SupplierId::new(3)));
        assert_eq!(order.carrier_id, Some(CarrierId::new(2)));
        assert_eq!(order.status_kind(), Some(OrderStatus::Shipped));
    }

    #[test]
    fn test_new_order_requires_supplier_payment_and_carrier() {
        let new = NewOrder {
            order_date: Utc::now(),
            status: OrderStatus::Pending,
            total: 10.0,
            supplier_id: None,
            payment_method: None,
            credit_card_id: None,
            bank_account_id: None,
            carrier_id: None,
        };
        let errors = new.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("supplier_id"));
        assert!(fields.contains_key("payment_method"));
        assert!(fields.contains_key("carrier_id"));
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = OrderPatch {
            status: Some(OrderStatus::Delivered),
            ..OrderPatch::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).expect("serialize"),
            json!({"status": "delivered"})
        );
    }
}
