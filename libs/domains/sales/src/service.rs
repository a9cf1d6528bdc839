//! Sale Service - keeps product stock consistent with recorded sales

use domain_products::{Product, ProductRepository, StockAdjustment};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{SaleError, SaleResult};
use crate::journal::StockJournal;
use crate::models::{NewSale, Sale, SaleRequest};
use crate::repository::SaleRepository;

/// Passes `update_sale` makes before reporting a conflict
const UPDATE_ATTEMPTS: usize = 3;

/// Sale service providing business logic operations
///
/// Every stock change goes through [`ProductRepository::adjust_stock`], so two
/// requests racing for the last unit cannot both succeed. When a later step
/// fails, the adjustments already made are undone before the error returns.
pub struct SaleService<P: ProductRepository, S: SaleRepository> {
    products: Arc<P>,
    sales: Arc<S>,
}

impl<P: ProductRepository, S: SaleRepository> SaleService<P, S> {
    pub fn new(products: Arc<P>, sales: Arc<S>) -> Self {
        Self { products, sales }
    }

    #[instrument(skip(self, request))]
    pub async fn create_sale(&self, request: SaleRequest) -> SaleResult<Sale> {
        let (raw_product_id, quantity) = validated(request)?;

        let product_id = ObjectId::parse_str(&raw_product_id)
            .map_err(|_| SaleError::ProductNotFound(raw_product_id.clone()))?;
        let product = self
            .products
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| SaleError::ProductNotFound(raw_product_id.clone()))?;

        ensure_stock(&product, product.stock, quantity)?;
        let total_price = product.price * quantity as f64;

        let mut journal = StockJournal::new(self.products.as_ref());
        match journal.apply(product_id, 0, quantity).await? {
            StockAdjustment::Applied(_) => {}
            StockAdjustment::Insufficient { available } => {
                tracing::warn!(%product_id, available, quantity, "Stock taken by a concurrent sale");
                return Err(insufficient(product_id, quantity, available));
            }
            StockAdjustment::Missing => return Err(SaleError::ProductNotFound(raw_product_id)),
        }

        let new_sale = NewSale {
            product_id,
            total_product: quantity,
            total_price,
        };
        match self.sales.create(new_sale).await {
            Ok(sale) => {
                tracing::info!(sale_id = %sale.id, %product_id, quantity, "Sale recorded");
                Ok(sale)
            }
            Err(error) => {
                journal.rollback().await;
                Err(error)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list_sales(&self) -> SaleResult<Vec<Sale>> {
        self.sales.list().await
    }

    #[instrument(skip(self))]
    pub async fn get_sale(&self, id: &str) -> SaleResult<Sale> {
        let oid = ObjectId::parse_str(id).map_err(|_| SaleError::InvalidId(id.to_string()))?;
        self.sales
            .get_by_id(oid)
            .await?
            .ok_or_else(|| SaleError::SaleNotFound(id.to_string()))
    }

    /// Move a sale to a new product and/or quantity.
    ///
    /// All lookups and the stock check run before the first write. For the
    /// same product the release of the old quantity and the reservation of the
    /// new one are a single conditional update (stock 7 after a sale of 3,
    /// updated to 5, ends at 5). The sale is only overwritten if nobody else
    /// changed it since it was read; otherwise the stock moves are undone and
    /// the whole update runs again against the fresh sale.
    #[instrument(skip(self, request))]
    pub async fn update_sale(&self, id: &str, request: SaleRequest) -> SaleResult<Sale> {
        let (raw_product_id, quantity) = validated(request)?;

        for attempt in 1..=UPDATE_ATTEMPTS {
            match self.try_update_sale(id, &raw_product_id, quantity).await? {
                Some(sale) => return Ok(sale),
                None => tracing::warn!(sale_id = id, attempt, "Sale changed during update"),
            }
        }

        Err(SaleError::Conflict(id.to_string()))
    }

    /// One pass of [`Self::update_sale`]; `None` when the sale changed between
    /// the read and the write, after every stock move has been rolled back.
    async fn try_update_sale(
        &self,
        id: &str,
        raw_product_id: &str,
        quantity: i64,
    ) -> SaleResult<Option<Sale>> {
        let sale = self.get_sale(id).await?;

        let old_product = self
            .products
            .get_by_id(sale.product_id)
            .await?
            .ok_or_else(|| SaleError::OldProductNotFound(sale.product_id.to_hex()))?;

        let new_product_id = ObjectId::parse_str(raw_product_id)
            .map_err(|_| SaleError::NewProductNotFound(raw_product_id.to_string()))?;
        let same_product = new_product_id == old_product.id;

        let new_product = if same_product {
            old_product
        } else {
            self.products
                .get_by_id(new_product_id)
                .await?
                .ok_or_else(|| SaleError::NewProductNotFound(raw_product_id.to_string()))?
        };

        let available = if same_product {
            new_product.stock.saturating_add(sale.total_product)
        } else {
            new_product.stock
        };
        ensure_stock(&new_product, available, quantity)?;
        let total_price = new_product.price * quantity as f64;

        let mut journal = StockJournal::new(self.products.as_ref());
        let released = if same_product {
            sale.total_product
        } else {
            0
        };
        match journal.apply(new_product_id, released, quantity).await? {
            StockAdjustment::Applied(_) => {}
            StockAdjustment::Insufficient { available } => {
                tracing::warn!(product_id = %new_product_id, available, quantity, "Stock taken by a concurrent sale");
                return Err(insufficient(new_product_id, quantity, available));
            }
            StockAdjustment::Missing => {
                return Err(SaleError::NewProductNotFound(raw_product_id.to_string()));
            }
        }

        if !same_product {
            let restored = journal.apply(sale.product_id, sale.total_product, 0).await;
            let failure = match restored {
                Ok(StockAdjustment::Applied(_)) => None,
                Ok(_) => Some(SaleError::OldProductNotFound(sale.product_id.to_hex())),
                Err(error) => Some(error),
            };
            if let Some(error) = failure {
                journal.rollback().await;
                return Err(error);
            }
        }

        let updated = Sale {
            id: sale.id,
            product_id: new_product_id,
            total_product: quantity,
            total_price,
        };
        match self.sales.replace_if_current(sale, updated).await {
            Ok(Some(sale)) => {
                tracing::info!(sale_id = %sale.id, product_id = %new_product_id, quantity, "Sale updated");
                Ok(Some(sale))
            }
            Ok(None) => {
                journal.rollback().await;
                Ok(None)
            }
            Err(error) => {
                journal.rollback().await;
                Err(error)
            }
        }
    }
}

impl<P: ProductRepository, S: SaleRepository> Clone for SaleService<P, S> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            sales: Arc::clone(&self.sales),
        }
    }
}

/// Validate the request and pull out `(product_id, quantity)`.
fn validated(request: SaleRequest) -> SaleResult<(String, i64)> {
    request.validate()?;

    let SaleRequest {
        product_id: Some(product_id),
        quantity: Some(quantity),
    } = request
    else {
        return Err(SaleError::Validation(
            "product_id and quantity are required".to_string(),
        ));
    };
    Ok((product_id, quantity))
}

fn ensure_stock(product: &Product, available: i64, quantity: i64) -> SaleResult<()> {
    if available < quantity {
        tracing::warn!(product_id = %product.id, available, quantity, "Insufficient stock");
        return Err(insufficient(product.id, quantity, available));
    }
    Ok(())
}

fn insufficient(product_id: ObjectId, requested: i64, available: i64) -> SaleError {
    SaleError::InsufficientStock {
        product_id: product_id.to_hex(),
        requested,
        available,
    }
}
