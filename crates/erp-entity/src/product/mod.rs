//! Product catalog entities.

pub mod model;

pub use model::{NewProduct, Product, ProductPatch, image_extension};
