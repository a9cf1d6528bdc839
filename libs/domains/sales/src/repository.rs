use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::SaleResult;
use crate::models::{NewSale, Sale};

/// Repository trait for Sale persistence
///
/// Sales are never deleted; `replace_if_current` overwrites every field but the id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaleRepository: Send + Sync {
    async fn create(&self, input: NewSale) -> SaleResult<Sale>;

    /// All sales, oldest first
    async fn list(&self) -> SaleResult<Vec<Sale>>;

    async fn get_by_id(&self, id: ObjectId) -> SaleResult<Option<Sale>>;

    /// Overwrite the sale with `updated`, but only while the stored sale still
    /// references `current.product_id` for `current.total_product` units.
    ///
    /// `None` when the sale is gone or another writer changed it first.
    async fn replace_if_current(&self, current: Sale, updated: Sale) -> SaleResult<Option<Sale>>;
}

/// In-memory implementation of SaleRepository (for testing and development)
#[derive(Clone, Default)]
pub struct InMemorySaleRepository {
    sales: Arc<RwLock<HashMap<ObjectId, Sale>>>,
}

impl InMemorySaleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SaleRepository for InMemorySaleRepository {
    async fn create(&self, input: NewSale) -> SaleResult<Sale> {
        let sale = Sale::new(input);
        self.sales.write().await.insert(sale.id, sale.clone());

        tracing::info!(sale_id = %sale.id, product_id = %sale.product_id, "Created sale");
        Ok(sale)
    }

    async fn list(&self) -> SaleResult<Vec<Sale>> {
        let sales = self.sales.read().await;
        let mut result: Vec<Sale> = sales.values().cloned().collect();
        result.sort_by_key(|s| s.id);
        Ok(result)
    }

    async fn get_by_id(&self, id: ObjectId) -> SaleResult<Option<Sale>> {
        Ok(self.sales.read().await.get(&id).cloned())
    }

    async fn replace_if_current(&self, current: Sale, updated: Sale) -> SaleResult<Option<Sale>> {
        let mut sales = self.sales.write().await;
        let Some(stored) = sales.get_mut(&current.id) else {
            return Ok(None);
        };
        if stored.product_id != current.product_id || stored.total_product != current.total_product
        {
            return Ok(None);
        }

        *stored = Sale {
            id: current.id,
            ..updated
        };
        Ok(Some(stored.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(total_product: i64) -> NewSale {
        NewSale {
            product_id: ObjectId::new(),
            total_product,
            total_price: total_product as f64 * 2.5,
        }
    }

    #[tokio::test]
    async fn test_create_get_and_list() {
        let repo = InMemorySaleRepository::new();
        let first = repo.create(input(1)).await.unwrap();
        let second = repo.create(input(2)).await.unwrap();

        assert_eq!(repo.get_by_id(first.id).await.unwrap(), Some(first.clone()));
        assert_eq!(repo.list().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_replace_keeps_id() {
        let repo = InMemorySaleRepository::new();
        let sale = repo.create(input(1)).await.unwrap();

        let changed = Sale {
            total_product: 4,
            total_price: 10.0,
            ..sale.clone()
        };
        let replaced = repo
            .replace_if_current(sale.clone(), changed.clone())
            .await
            .unwrap();

        assert_eq!(replaced, Some(changed.clone()));
        assert_eq!(repo.get_by_id(sale.id).await.unwrap(), Some(changed));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_refuses_stale_sale() {
        let repo = InMemorySaleRepository::new();
        let sale = repo.create(input(1)).await.unwrap();

        let first = Sale {
            total_product: 2,
            ..sale.clone()
        };
        let second = Sale {
            total_product: 3,
            ..sale.clone()
        };

        assert!(repo.replace_if_current(sale.clone(), first.clone()).await.unwrap().is_some());
        assert!(repo.replace_if_current(sale.clone(), second).await.unwrap().is_none());
        assert_eq!(repo.get_by_id(sale.id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_replace_missing_returns_none() {
        let repo = InMemorySaleRepository::new();
        let ghost = Sale::new(input(1));
        assert!(repo.replace_if_current(ghost.clone(), ghost).await.unwrap().is_none());
    }
}
