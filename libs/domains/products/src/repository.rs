use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, StockAdjustment, UpdateProduct};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    /// All products, oldest first
    async fn list(&self) -> ProductResult<Vec<Product>>;

    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// Write only the supplied fields of `changes`; `None` if the product does not exist
    async fn update(&self, id: ObjectId, changes: UpdateProduct) -> ProductResult<Option<Product>>;

    /// Number of products removed (0 or 1)
    async fn delete(&self, id: ObjectId) -> ProductResult<u64>;

    async fn delete_all(&self) -> ProductResult<u64>;

    /// Atomically add `release` to and subtract `reserve` from the product's stock,
    /// provided `stock + release >= reserve`.
    ///
    /// The check and the write are one operation, so concurrent callers can never
    /// drive stock below zero. Both amounts are non-negative; a result above
    /// `i64::MAX` fails with [`ProductError::StockOverflow`] and writes nothing.
    async fn adjust_stock(
        &self,
        id: ObjectId,
        release: i64,
        reserve: i64,
    ) -> ProductResult<StockAdjustment>;
}

/// In-memory implementation of ProductRepository (for testing and development)
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<ObjectId, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        self.products
            .write()
            .await
            .insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut result: Vec<Product> = products.values().cloned().collect();
        result.sort_by_key(|p| p.id);
        Ok(result)
    }

    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn update(&self, id: ObjectId, changes: UpdateProduct) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(brand) = changes.brand {
            product.brand = brand;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }

        tracing::info!(product_id = %id, "Updated product");
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: ObjectId) -> ProductResult<u64> {
        let removed = self.products.write().await.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn delete_all(&self) -> ProductResult<u64> {
        let mut products = self.products.write().await;
        let count = products.len() as u64;
        products.clear();
        Ok(count)
    }

    async fn adjust_stock(
        &self,
        id: ObjectId,
        release: i64,
        reserve: i64,
    ) -> ProductResult<StockAdjustment> {
        let mut products = self.products.write().await;
        let Some(product) = products.get_mut(&id) else {
            return Ok(StockAdjustment::Missing);
        };

        let net = release - reserve;
        if product.stock < -net {
            return Ok(StockAdjustment::Insufficient {
                available: product.stock.saturating_add(release),
            });
        }

        let Some(stock) = product.stock.checked_add(net) else {
            return Err(ProductError::StockOverflow {
                product_id: id.to_hex(),
                stock: product.stock,
                added: net,
            });
        };

        product.stock = stock;
        Ok(StockAdjustment::Applied(product.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            brand: "Nokia".to_string(),
            stock,
            price: 120.0,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(input("3310", 5)).await.unwrap();

        let fetched = repo.get_by_id(product.id).await.unwrap();
        assert_eq!(fetched, Some(product));
    }

    #[tokio::test]
    async fn test_list_in_creation_order() {
        let repo = InMemoryProductRepository::new();
        let first = repo.create(input("first", 1)).await.unwrap();
        let second = repo.create(input("second", 1)).await.unwrap();

        let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_update_only_touches_supplied_fields() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(input("3310", 5)).await.unwrap();

        let updated = repo
            .update(
                product.id,
                UpdateProduct {
                    brand: Some("HMD".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.brand, "HMD");
        assert_eq!(updated.name, "3310");
        assert_eq!(updated.stock, 5);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = InMemoryProductRepository::new();
        let result = repo
            .update(ObjectId::new(), UpdateProduct::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_and_delete_all_counts() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(input("a", 1)).await.unwrap();
        repo.create(input("b", 1)).await.unwrap();
        repo.create(input("c", 1)).await.unwrap();

        assert_eq!(repo.delete(product.id).await.unwrap(), 1);
        assert_eq!(repo.delete(product.id).await.unwrap(), 0);
        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert_eq!(repo.delete_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_adjust_stock_applies_release_then_reserve() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(input("a", 7)).await.unwrap();

        let outcome = repo.adjust_stock(product.id, 3, 5).await.unwrap();
        match outcome {
            StockAdjustment::Applied(p) => assert_eq!(p.stock, 5),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_adjust_stock_insufficient_leaves_stock() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(input("a", 2)).await.unwrap();

        let outcome = repo.adjust_stock(product.id, 0, 3).await.unwrap();
        assert_eq!(outcome, StockAdjustment::Insufficient { available: 2 });

        let stored = repo.get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(stored.stock, 2);
    }

    #[tokio::test]
    async fn test_adjust_stock_overflow_leaves_stock() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(input("a", i64::MAX - 1)).await.unwrap();

        let err = repo.adjust_stock(product.id, 3, 1).await.unwrap_err();
        assert!(matches!(err, ProductError::StockOverflow { added: 2, .. }));

        let stored = repo.get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(stored.stock, i64::MAX - 1);

        // Releasing and reserving the same amount at the ceiling is fine
        let outcome = repo.adjust_stock(product.id, 3, 3).await.unwrap();
        assert!(matches!(outcome, StockAdjustment::Applied(p) if p.stock == i64::MAX - 1));
    }

    #[tokio::test]
    async fn test_adjust_stock_missing() {
        let repo = InMemoryProductRepository::new();
        let outcome = repo.adjust_stock(ObjectId::new(), 0, 1).await.unwrap();
        assert_eq!(outcome, StockAdjustment::Missing);
    }
}
