//! Order creation, detail and editing.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future;
use tracing::{info, warn};
use validator::Validate;

use erp_core::error::AppError;
use erp_core::result::AppResult;
use erp_core::traits::{QueryBackend, Repository, TableRow};
use erp_core::types::{FetchParams, FilterField, OrderId, PageResponse, ParentChildInsert, ProductId};
use erp_database::repositories::table::{decode_rows, encode_payload, validation_error};
use erp_database::TableRepository;
use erp_entity::order::{
    NewOrder, NewOrderItem, Order, OrderItem, OrderPatch, OrderStatus, order_total,
};
use erp_entity::partner::{Carrier, Supplier};
use erp_entity::product::Product;

use crate::context::RequestContext;

use super::detail::OrderDetail;
use super::form::CreateOrderRequest;

/// Column of `itens_pedido` pointing at the order header.
const ORDER_KEY: &str = "pedido_id";

/// Manages orders and their line items.
#[derive(Debug, Clone)]
pub struct OrderService {
    /// Backend used for the atomic header + items write.
    backend: Arc<dyn QueryBackend>,
    /// Order headers.
    orders: TableRepository<Order>,
    /// Line items.
    items: TableRepository<OrderItem>,
    /// Products, for default line prices.
    products: TableRepository<Product>,
    /// Suppliers, for the detail view.
    suppliers: TableRepository<Supplier>,
    /// Carriers, for the detail view.
    carriers: TableRepository<Carrier>,
}

impl OrderService {
    /// Creates a new order service.
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            orders: TableRepository::new(Arc::clone(&backend)),
            items: TableRepository::new(Arc::clone(&backend)),
            products: TableRepository::new(Arc::clone(&backend)),
            suppliers: TableRepository::new(Arc::clone(&backend)),
            carriers: TableRepository::new(Arc::clone(&backend)),
            backend,
        }
    }

    /// One page of orders.
    pub async fn list(&self, params: &FetchParams) -> AppResult<PageResponse<Order>> {
        self.orders.list(params).await
    }

    /// Creates an order and its items as one unit.
    ///
    /// Lines without a unit price take the product's current price. The
    /// total is the sum of the line totals, the date is now and the status
    /// defaults to pending. Either the header and every item are stored,
    /// or nothing is.
    pub async fn create_order(
        &self,
        ctx: &RequestContext,
        req: CreateOrderRequest,
    ) -> AppResult<OrderDetail> {
        let lines = self.price_lines(&req).await?;
        for line in &lines {
            line.validate().map_err(validation_error)?;
        }

        let header = NewOrder {
            order_date: Utc::now(),
            status: req.status.unwrap_or(OrderStatus::Pending),
            total: order_total(&lines),
            supplier_id: req.supplier_id,
            payment_method: req.payment_method,
            credit_card_id: req.credit_card_id,
            bank_account_id: req.bank_account_id,
            carrier_id: req.carrier_id,
        };
        header.validate().map_err(validation_error)?;

        let request = ParentChildInsert {
            parent_table: Order::TABLE.to_string(),
            parent: encode_payload(&header)?,
            child_table: OrderItem::TABLE.to_string(),
            parent_key: ORDER_KEY.to_string(),
            children: lines.iter().map(encode_payload).collect::<AppResult<_>>()?,
        };

        let stored = self.backend.insert_with_children(request).await?;
        let order = decode_rows::<Order>(Order::TABLE, vec![stored.parent])?
            .pop()
            .ok_or_else(|| AppError::database("Backend returned no order row"))?;

        info!(
            order_id = %order.id,
            items = stored.children.len(),
            total = order.total,
            user_id = %ctx.user_id(),
            "Order created"
        );

        self.order_detail(order.id).await
    }

    /// Loads an order with its items, supplier and carrier.
    ///
    /// The three related reads run concurrently. A failing one is logged
    /// and shown as empty; the others are still returned.
    pub async fn order_detail(&self, id: OrderId) -> AppResult<OrderDetail> {
        let order = self.orders.get(id).await?;

        let item_filter = [FilterField::eq(ORDER_KEY, id)];
        let items = self.items.find_where(&item_filter, None);
        let supplier = async {
            match order.supplier_id {
                Some(sid) => self.suppliers.find_by_id(sid).await,
                None => Ok(None),
            }
        };
        let carrier = async {
            match order.carrier_id {
                Some(cid) => self.carriers.find_by_id(cid).await,
                None => Ok(None),
            }
        };

        let (items, supplier, carrier) = future::join3(items, supplier, carrier).await;

        let items = items.unwrap_or_else(|e| {
            warn!(order_id = %id, error = %e, "Failed to load order items");
            Vec::new()
        });
        let supplier = supplier.unwrap_or_else(|e| {
            warn!(order_id = %id, error = %e, "Failed to load order supplier");
            None
        });
        let carrier = carrier.unwrap_or_else(|e| {
            warn!(order_id = %id, error = %e, "Failed to load order carrier");
            None
        });

        Ok(OrderDetail {
            order,
            items,
            supplier,
            carrier,
        })
    }

    /// Edits the order date, status or total.
    pub async fn update_order(
        &self,
        ctx: &RequestContext,
        id: OrderId,
        patch: OrderPatch,
    ) -> AppResult<Order> {
        patch.validate().map_err(validation_error)?;
        let order = self.orders.update(id, &patch).await?;
        info!(
            order_id = %id,
            status = %order.status,
            user_id = %ctx.user_id(),
            "Order updated"
        );
        Ok(order)
    }

    /// Resolves every line's unit price, reading each distinct product
    /// that has no explicit price once.
    async fn price_lines(&self, req: &CreateOrderRequest) -> AppResult<Vec<NewOrderItem>> {
        let mut prices: HashMap<ProductId, f64> = HashMap::new();
        for line in req.items.iter().filter(|l| l.unit_price.is_none()) {
            if prices.contains_key(&line.product_id) {
                continue;
            }
            let product = self.products.find_by_id(line.product_id).await?.ok_or_else(|| {
                AppError::validation(format!("Product {} not found", line.product_id))
            })?;
            prices.insert(line.product_id, product.price);
        }

        Ok(req
            .items
            .iter()
            .map(|line| NewOrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line
                    .unit_price
                    .or_else(|| prices.get(&line.product_id).copied())
                    .unwrap_or_default(),
            })
            .collect())
    }
}
