//! Product CRUD with image upload.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use validator::Validate;

use erp_core::error::AppError;
use erp_core::result::AppResult;
use erp_core::traits::{ObjectStorage, QueryBackend, Repository};
use erp_core::types::{FetchParams, PageResponse, ProductId};
use erp_database::repositories::table::validation_error;
use erp_database::TableRepository;
use erp_entity::product::{NewProduct, Product, ProductPatch, image_extension};
use erp_storage::random_object_name;

use crate::context::RequestContext;

/// An image attached to the add-product form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Name of the file as picked by the user.
    pub file_name: String,
    /// MIME type reported by the client.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

/// Manages products and their images.
#[derive(Debug, Clone)]
pub struct ProductService {
    /// Product repository.
    products: TableRepository<Product>,
    /// Image bucket.
    storage: Arc<dyn ObjectStorage>,
    /// Largest accepted image.
    max_image_bytes: usize,
}

impl ProductService {
    /// Creates a new product service.
    pub fn new(
        backend: Arc<dyn QueryBackend>,
        storage: Arc<dyn ObjectStorage>,
        max_image_bytes: usize,
    ) -> Self {
        Self {
            products: TableRepository::new(backend),
            storage,
            max_image_bytes,
        }
    }

    /// One page of products.
    pub async fn list(&self, params: &FetchParams) -> AppResult<PageResponse<Product>> {
        self.products.list(params).await
    }

    /// Gets a product by ID.
    pub async fn get_product(&self, id: ProductId) -> AppResult<Product> {
        self.products.get(id).await
    }

    /// Creates a product, uploading `image` first when given.
    ///
    /// The image is stored under a random name that keeps its extension
    /// and its public URL becomes the product's `image_url`. If the row
    /// cannot be stored the uploaded image is removed again.
    pub async fn create_product(
        &self,
        ctx: &RequestContext,
        mut new: NewProduct,
        image: Option<ImageUpload>,
    ) -> AppResult<Product> {
        new.validate().map_err(validation_error)?;

        let uploaded = match image {
            Some(image) => {
                let path = self.upload_image(image).await?;
                new.image_url = Some(self.storage.public_url(&path));
                Some(path)
            }
            None => None,
        };

        let product = match self.products.insert(&new).await {
            Ok(product) => product,
            Err(e) => {
                if let Some(path) = &uploaded {
                    if let Err(cleanup) = self.storage.delete(path).await {
                        warn!(path = %path, error = %cleanup, "Failed to remove orphaned product image");
                    }
                }
                return Err(e);
            }
        };

        info!(
            product_id = %product.id,
            sku = %product.sku,
            has_image = uploaded.is_some(),
            user_id = %ctx.user_id(),
            "Product created"
        );
        Ok(product)
    }

    /// Updates product fields.
    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        patch: ProductPatch,
    ) -> AppResult<Product> {
        let product = self.products.update(id, &patch).await?;
        info!(product_id = %id, user_id = %ctx.user_id(), "Product updated");
        Ok(product)
    }

    async fn upload_image(&self, image: ImageUpload) -> AppResult<String> {
        if image.data.is_empty() {
            return Err(AppError::validation("Image file is empty"));
        }
        if image.data.len() > self.max_image_bytes {
            return Err(AppError::validation(format!(
                "Image exceeds the maximum size of {} bytes",
                self.max_image_bytes
            )));
        }

        let extension = image_extension(&image.file_name);
        let path = random_object_name(extension.as_deref());
        let stored = self
            .storage
            .upload(&path, image.data, image.content_type.as_deref())
            .await?;
        info!(path = %stored.path, size = stored.size_bytes, "Product image uploaded");
        Ok(stored.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erp_core::error::ErrorKind;
    use erp_database::MemoryBackend;
    use erp_storage::LocalStorageProvider;

    use crate::context::test_context as ctx;

    fn new_product() -> NewProduct {
        NewProduct {
            name: "Parafuso".into(),
            description: Some("Sextavado 1/4".into()),
            price: 0.35,
            stock: 1000,
            sku: "PRF-001".into(),
            image_url: None,
        }
    }

    fn png() -> ImageUpload {
        ImageUpload {
            file_name: "Foto.PNG".into(),
            content_type: Some("image/png".into()),
            data: Bytes::from_static(b"\x89PNG fake"),
        }
    }

    async fn service(root: &std::path::Path, backend: Arc<MemoryBackend>) -> (ProductService, Arc<LocalStorageProvider>) {
        let storage = Arc::new(
            LocalStorageProvider::new(
                root.to_str().expect("utf-8 path"),
                "product-images",
                "http://localhost:8080/files",
            )
            .await
            .expect("storage"),
        );
        (ProductService::new(backend, storage.clone(), 1024), storage)
    }

    fn stored_files(root: &std::path::Path) -> usize {
        std::fs::read_dir(root.join("product-images"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_create_with_image_stores_public_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = Arc::new(MemoryBackend::new());
        let (service, storage) = service(dir.path(), backend).await;

        let product = service
            .create_product(&ctx(), new_product(), Some(png()))
            .await
            .expect("create");

        let url = product.image_url.expect("image url");
        assert!(url.starts_with("http://localhost:8080/files/product-images/"));
        assert!(url.ends_with(".png"));
        let object = url.rsplit('/').next().expect("object name");
        let data = storage.read_bytes(object).await.expect("read back");
        assert_eq!(&data[..], b"\x89PNG fake");
    }

    #[tokio::test]
    async fn test_create_without_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = Arc::new(MemoryBackend::new());
        let (service, _) = service(dir.path(), backend).await;

        let product = service
            .create_product(&ctx(), new_product(), None)
            .await
            .expect("create");
        assert!(product.image_url.is_none());
        assert_eq!(stored_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_oversized_image_is_rejected_before_upload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = Arc::new(MemoryBackend::new());
        let (service, _) = service(dir.path(), backend.clone()).await;
        let image = ImageUpload {
            data: Bytes::from(vec![0u8; 2048]),
            ..png()
        };

        let err = service
            .create_product(&ctx(), new_product(), Some(image))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(stored_files(dir.path()), 0);
        assert!(backend.dump("produtos").await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_insert_removes_uploaded_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = Arc::new(MemoryBackend::new());
        backend.fail_writes_to("produtos").await;
        let (service, _) = service(dir.path(), backend).await;

        let result = service.create_product(&ctx(), new_product(), Some(png())).await;
        assert!(result.is_err());
        assert_eq!(stored_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_invalid_product_uploads_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = Arc::new(MemoryBackend::new());
        let (service, _) = service(dir.path(), backend).await;
        let mut invalid = new_product();
        invalid.sku = String::new();

        let err = service
            .create_product(&ctx(), invalid, Some(png()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(stored_files(dir.path()), 0);
    }
}
