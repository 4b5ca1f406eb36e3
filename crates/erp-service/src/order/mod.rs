//! Order creation, detail and editing.

pub mod detail;
pub mod form;
pub mod service;

pub use detail::OrderDetail;
pub use form::{CreateOrderRequest, OrderLineRequest};
pub use service::OrderService;
