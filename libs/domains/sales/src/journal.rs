//! Record of applied stock adjustments so a failed sale can put stock back.

use domain_products::{ProductRepository, StockAdjustment};
use mongodb::bson::oid::ObjectId;

use crate::error::SaleResult;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    product_id: ObjectId,
    release: i64,
    reserve: i64,
}

pub(crate) struct StockJournal<'a, P: ProductRepository> {
    products: &'a P,
    applied: Vec<Entry>,
}

impl<'a, P: ProductRepository> StockJournal<'a, P> {
    pub(crate) fn new(products: &'a P) -> Self {
        Self {
            products,
            applied: Vec::new(),
        }
    }

    /// Run `adjust_stock` and remember it when it was applied.
    pub(crate) async fn apply(
        &mut self,
        product_id: ObjectId,
        release: i64,
        reserve: i64,
    ) -> SaleResult<StockAdjustment> {
        let outcome = self
            .products
            .adjust_stock(product_id, release, reserve)
            .await?;

        if matches!(outcome, StockAdjustment::Applied(_)) {
            self.applied.push(Entry {
                product_id,
                release,
                reserve,
            });
        }
        Ok(outcome)
    }

    /// Undo every applied adjustment, newest first.
    ///
    /// Failures are logged and skipped.
    pub(crate) async fn rollback(self) {
        for entry in self.applied.into_iter().rev() {
            match self
                .products
                .adjust_stock(entry.product_id, entry.reserve, entry.release)
                .await
            {
                Ok(StockAdjustment::Applied(product)) => {
                    tracing::info!(
                        product_id = %entry.product_id,
                        stock = product.stock,
                        "Stock adjustment rolled back"
                    );
                }
                Ok(outcome) => {
                    tracing::error!(
                        product_id = %entry.product_id,
                        release = entry.release,
                        reserve = entry.reserve,
                        ?outcome,
                        "Failed to roll back stock adjustment"
                    );
                }
                Err(error) => {
                    tracing::error!(
                        product_id = %entry.product_id,
                        release = entry.release,
                        reserve = entry.reserve,
                        %error,
                        "Failed to roll back stock adjustment"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_products::{InMemoryProductRepository, NewProduct, Product};

    async fn product(repo: &InMemoryProductRepository, stock: i64) -> Product {
        repo.create(NewProduct {
            name: "Lumia".to_string(),
            brand: "Microsoft".to_string(),
            stock,
            price: 99.0,
        })
        .await
        .unwrap()
    }

    async fn stock(repo: &InMemoryProductRepository, id: ObjectId) -> i64 {
        repo.get_by_id(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_rollback_restores_in_reverse() {
        let repo = InMemoryProductRepository::new();
        let a = product(&repo, 10).await;
        let b = product(&repo, 0).await;

        let mut journal = StockJournal::new(&repo);
        journal.apply(a.id, 0, 4).await.unwrap();
        journal.apply(b.id, 3, 0).await.unwrap();
        assert_eq!(stock(&repo, a.id).await, 6);
        assert_eq!(stock(&repo, b.id).await, 3);

        journal.rollback().await;
        assert_eq!(stock(&repo, a.id).await, 10);
        assert_eq!(stock(&repo, b.id).await, 0);
    }

    #[tokio::test]
    async fn test_refused_adjustment_not_journaled() {
        let repo = InMemoryProductRepository::new();
        let a = product(&repo, 1).await;

        let mut journal = StockJournal::new(&repo);
        let outcome = journal.apply(a.id, 0, 2).await.unwrap();
        assert_eq!(outcome, StockAdjustment::Insufficient { available: 1 });

        journal.rollback().await;
        assert_eq!(stock(&repo, a.id).await, 1);
    }
}
