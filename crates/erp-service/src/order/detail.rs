//! Order detail view model.

use serde::Serialize;

use erp_entity::NOT_AVAILABLE;
use erp_entity::format_currency;
use erp_entity::order::{Order, OrderItem};
use erp_entity::partner::{Carrier, Supplier};

/// An order with its items and related parties, as shown in the detail
/// dialog. Related rows that could not be loaded are `None`/empty.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    /// The order header.
    pub order: Order,
    /// Line items with product names.
    pub items: Vec<OrderItem>,
    /// Supplier row, if it could be loaded.
    pub supplier: Option<Supplier>,
    /// Carrier row, if it could be loaded.
    pub carrier: Option<Carrier>,
}

impl OrderDetail {
    /// Supplier name or the placeholder.
    pub fn supplier_name(&self) -> &str {
        self.supplier.as_ref().map_or(NOT_AVAILABLE, |s| s.name.as_str())
    }

    /// Carrier name or the placeholder.
    pub fn carrier_name(&self) -> &str {
        self.carrier.as_ref().map_or(NOT_AVAILABLE, |c| c.name.as_str())
    }

    /// Sum of the loaded line totals.
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Order total formatted for display.
    pub fn total_display(&self) -> String {
        format_currency(self.order.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erp_core::types::OrderId;

    #[test]
    fn test_missing_relations_show_placeholder() {
        let detail = OrderDetail {
            order: Order {
                id: OrderId::new(1),
                order_date: None,
                status: "pending".into(),
                total: 12.5,
                supplier_id: None,
                payment_method: None,
                credit_card_id: None,
                bank_account_id: None,
                carrier_id: None,
            },
            items: Vec::new(),
            supplier: None,
            carrier: None,
        };
        assert_eq!(detail.supplier_name(), "N/A");
        assert_eq!(detail.carrier_name(), "N/A");
        assert_eq!(detail.total_display(), "R$ 12.50");
        assert_eq!(detail.items_total(), 0.0);
    }
}
