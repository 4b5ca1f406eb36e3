//! Add-order form payload.

use serde::{Deserialize, Serialize};

use erp_core::types::{BankAccountId, CarrierId, CreditCardId, ProductId, SupplierId};
use erp_entity::order::{OrderStatus, PaymentMethod};

/// Request to create an order with its line items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Supplier the goods are bought from.
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    /// Payment method.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Card charged, for card payments.
    #[serde(default)]
    pub credit_card_id: Option<CreditCardId>,
    /// Account debited, for bank transfers.
    #[serde(default)]
    pub bank_account_id: Option<BankAccountId>,
    /// Carrier delivering the order.
    #[serde(default)]
    pub carrier_id: Option<CarrierId>,
    /// Initial status; `pending` when omitted.
    #[serde(default)]
    pub status: Option<OrderStatus>,
    /// Line items.
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
}

/// One line of the add-order form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineRequest {
    /// Ordered product.
    pub product_id: ProductId,
    /// Ordered quantity.
    pub quantity: i64,
    /// Price per unit; the product's current price when omitted.
    #[serde(default)]
    pub unit_price: Option<f64>,
}

impl OrderLineRequest {
    /// A line priced from the product.
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
            unit_price: None,
        }
    }

    /// Override the unit price.
    pub fn priced(mut self, unit_price: f64) -> Self {
        self.unit_price = Some(unit_price);
        self
    }
}
