//! Purchase order entities (`pedidos` and `itens_pedido`).

pub mod item;
pub mod model;
pub mod payment;
pub mod status;

pub use item::{NewOrderItem, OrderItem, OrderItemPatch, order_total};
pub use model::{NewOrder, Order, OrderPatch};
pub use payment::PaymentMethod;
pub use status::OrderStatus;
