//! Product Service - Business logic layer

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, NewProduct, Product, UpdateProduct};
use crate::repository::ProductRepository;

/// Parse a 24-character hex ObjectId, rejecting anything else as `InvalidId`.
pub fn parse_id(raw: &str) -> ProductResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| ProductError::InvalidId(raw.to_string()))
}

/// Product service providing business logic operations
///
/// Validation happens here as well as in the HTTP extractor so that
/// callers bypassing the router get the same rules.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    /// Build a service over a repository that is shared with other services.
    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;

        let CreateProduct {
            name: Some(name),
            brand: Some(brand),
            stock: Some(stock),
            price: Some(price),
        } = input
        else {
            return Err(ProductError::Validation(
                "name, brand, stock and price are required".to_string(),
            ));
        };

        self.repository
            .create(NewProduct {
                name,
                brand,
                stock,
                price,
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        let oid = parse_id(id)?;
        self.repository
            .get_by_id(oid)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Merge `input` over the stored product, validate the result, then persist
    /// only the supplied fields.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        let oid = parse_id(id)?;
        input.validate()?;

        let existing = self
            .repository
            .get_by_id(oid)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

        existing.merged_with(&input).validate()?;

        if input.is_empty() {
            return Ok(existing);
        }

        self.repository
            .update(oid, input)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> ProductResult<u64> {
        let oid = parse_id(id)?;
        match self.repository.delete(oid).await? {
            0 => Err(ProductError::NotFound(id.to_string())),
            deleted => Ok(deleted),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_all_products(&self) -> ProductResult<u64> {
        self.repository.delete_all().await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryProductRepository, MockProductRepository};

    fn service() -> ProductService<InMemoryProductRepository> {
        ProductService::new(InMemoryProductRepository::new())
    }

    fn create_input(stock: i64) -> CreateProduct {
        CreateProduct {
            name: Some("iPhone 15".to_string()),
            brand: Some("Apple".to_string()),
            stock: Some(stock),
            price: Some(999.0),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let service = service();
        let product = service.create_product(create_input(10)).await.unwrap();

        let fetched = service.get_product(&product.id.to_hex()).await.unwrap();
        assert_eq!(fetched, product);
        assert_eq!(fetched.stock, 10);
    }

    #[tokio::test]
    async fn test_create_missing_field_is_validation_error() {
        let service = service();
        let input = CreateProduct {
            price: None,
            ..create_input(1)
        };

        let err = service.create_product(input).await.unwrap_err();
        assert!(matches!(err, ProductError::InvalidFields(_)));
    }

    #[tokio::test]
    async fn test_create_negative_stock_rejected() {
        let err = service().create_product(create_input(-1)).await.unwrap_err();
        assert!(matches!(err, ProductError::InvalidFields(_)));
    }

    #[tokio::test]
    async fn test_malformed_id_distinct_from_missing() {
        let service = service();

        let malformed = service.get_product("not-an-id").await.unwrap_err();
        assert!(matches!(malformed, ProductError::InvalidId(_)));

        let missing = service
            .get_product(&ObjectId::new().to_hex())
            .await
            .unwrap_err();
        assert!(matches!(missing, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_merges_and_validates() {
        let service = service();
        let product = service.create_product(create_input(10)).await.unwrap();
        let id = product.id.to_hex();

        let updated = service
            .update_product(
                &id,
                UpdateProduct {
                    price: Some(899.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 899.0);
        assert_eq!(updated.stock, 10);
        assert_eq!(updated.name, "iPhone 15");

        let err = service
            .update_product(
                &id,
                UpdateProduct {
                    name: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::InvalidFields(_)));
    }

    #[tokio::test]
    async fn test_update_empty_body_returns_existing() {
        let service = service();
        let product = service.create_product(create_input(2)).await.unwrap();

        let same = service
            .update_product(&product.id.to_hex(), UpdateProduct::default())
            .await
            .unwrap();
        assert_eq!(same, product);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let err = service()
            .update_product(&ObjectId::new().to_hex(), UpdateProduct::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let service = service();
        let product = service.create_product(create_input(1)).await.unwrap();
        let id = product.id.to_hex();

        assert_eq!(service.delete_product(&id).await.unwrap(), 1);
        assert!(matches!(
            service.delete_product(&id).await.unwrap_err(),
            ProductError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_all_products() {
        let service = service();
        assert_eq!(service.delete_all_products().await.unwrap(), 0);

        service.create_product(create_input(1)).await.unwrap();
        service.create_product(create_input(2)).await.unwrap();
        assert_eq!(service.delete_all_products().await.unwrap(), 2);
        assert!(service.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut mock = MockProductRepository::new();
        mock.expect_list().returning(|| {
            Err(ProductError::Database(mongodb::error::Error::from(
                std::io::Error::other("connection reset"),
            )))
        });

        let service = ProductService::new(mock);
        let err = service.list_products().await.unwrap_err();
        assert!(matches!(err, ProductError::Database(_)));
    }

    #[tokio::test]
    async fn test_update_does_not_write_when_merged_record_invalid() {
        let oid = ObjectId::new();
        let stored = Product {
            id: oid,
            name: "Galaxy".to_string(),
            brand: "Samsung".to_string(),
            stock: 1,
            price: 100.0,
        };

        let mut mock = MockProductRepository::new();
        mock.expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        mock.expect_update().never();

        let service = ProductService::new(mock);
        let err = service
            .update_product(
                &oid.to_hex(),
                UpdateProduct {
                    stock: Some(-4),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::InvalidFields(_)));
    }
}
