//! Suppliers, carriers and customers.

pub mod carrier;
pub mod customer;
pub mod supplier;

pub use carrier::{Carrier, CarrierPatch, NewCarrier};
pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use supplier::{NewSupplier, Supplier, SupplierPatch};
