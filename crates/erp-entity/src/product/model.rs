//! Product row (`produtos`).

use erp_core::traits::TableRow;
use erp_core::types::{ProductId, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Free-text description.
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    /// List price, used as the default unit price of new order lines.
    #[serde(rename = "preco")]
    pub price: f64,
    /// Units in stock.
    #[serde(rename = "estoque")]
    pub stock: i64,
    /// Stock keeping unit.
    pub sku: String,
    /// Public URL of the product image.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl TableRow for Product {
    const TABLE: &'static str = "produtos";
    type Id = ProductId;
    type New = NewProduct;
    type Patch = ProductPatch;

    fn default_order() -> Option<SortField> {
        Some(SortField::asc("nome"))
    }

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Data required to create a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProduct {
    /// Product name.
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Free-text description.
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    /// List price.
    #[serde(rename = "preco")]
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    /// Units in stock.
    #[serde(rename = "estoque")]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i64,
    /// Stock keeping unit.
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    /// Public URL of an uploaded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Editable fields of a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    /// New name.
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New price.
    #[serde(rename = "preco", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// New stock level.
    #[serde(rename = "estoque", default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    /// New SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// New image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Lowercased extension of an uploaded image's file name, if it has one.
pub fn image_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_product() -> NewProduct {
        NewProduct {
            name: "Parafuso".into(),
            description: None,
            price: 0.35,
            stock: 1000,
            sku: "PRF-001".into(),
            image_url: None,
        }
    }

    #[test]
    fn test_new_product_validation() {
        assert!(valid_product().validate().is_ok());

        let mut missing = valid_product();
        missing.name = String::new();
        missing.sku = String::new();
        let errors = missing.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("sku"));
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("foto.PNG"), Some("png".to_string()));
        assert_eq!(image_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(image_extension("noext"), None);
        assert_eq!(image_extension(".hidden"), None);
    }
}
