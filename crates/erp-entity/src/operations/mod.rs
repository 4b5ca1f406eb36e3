//! Operational lists: inventory movements, tracked purchase orders, sales
//! returns, complaints and marketplace questions.

pub mod complaint;
pub mod inventory;
pub mod marketplace;
pub mod purchase_order;
pub mod sales_return;

pub use complaint::{Complaint, ComplaintPatch, NewComplaint};
pub use inventory::{InventoryMovement, InventoryMovementPatch, NewInventoryMovement};
pub use marketplace::{MarketplaceQuestion, MarketplaceQuestionPatch, NewMarketplaceQuestion};
pub use purchase_order::{NewPurchaseOrder, PurchaseOrder, PurchaseOrderPatch};
pub use sales_return::{NewSalesReturn, SalesReturn, SalesReturnPatch};
