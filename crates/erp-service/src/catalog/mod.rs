//! Product catalog and carriers.

pub mod carrier;
pub mod product;

pub use carrier::CarrierService;
pub use product::{ImageUpload, ProductService};
