//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Document, doc, oid::ObjectId},
    options::{FindOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, StockAdjustment, UpdateProduct};
use crate::repository::ProductRepository;

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, "products")
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// `$set` document with the supplied fields of `changes`.
    fn set_document(changes: &UpdateProduct) -> Document {
        let mut set = doc! {};
        if let Some(ref name) = changes.name {
            set.insert("name", name);
        }
        if let Some(ref brand) = changes.brand {
            set.insert("brand", brand);
        }
        if let Some(stock) = changes.stock {
            set.insert("stock", stock);
        }
        if let Some(price) = changes.price {
            set.insert("price", price);
        }
        set
    }

    /// Filter matching `id` only when its stock can absorb the adjustment
    /// without going negative or past `i64::MAX`.
    fn adjust_filter(id: ObjectId, release: i64, reserve: i64) -> Document {
        let net = release - reserve;
        doc! {
            "_id": id,
            "stock": { "$gte": -net, "$lte": i64::MAX - net.max(0) },
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let product = Product::new(input);

        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let products: Vec<Product> = cursor.try_collect().await?;
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(product)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: ObjectId, changes: UpdateProduct) -> ProductResult<Option<Product>> {
        let set = Self::set_document(&changes);
        if set.is_empty() {
            return self.get_by_id(id).await;
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(product_id = %id, "Product updated successfully");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ProductResult<u64> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> ProductResult<u64> {
        let result = self.collection.delete_many(doc! {}).await?;
        tracing::info!(deleted_count = result.deleted_count, "Products deleted");
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn adjust_stock(
        &self,
        id: ObjectId,
        release: i64,
        reserve: i64,
    ) -> ProductResult<StockAdjustment> {
        let applied = self
            .collection
            .find_one_and_update(
                Self::adjust_filter(id, release, reserve),
                doc! { "$inc": { "stock": release - reserve } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        if let Some(product) = applied {
            tracing::info!(product_id = %id, release, reserve, stock = product.stock, "Stock adjusted");
            return Ok(StockAdjustment::Applied(product));
        }

        // Nothing matched: the product is gone or one of the stock bounds failed.
        let Some(product) = self.collection.find_one(doc! { "_id": id }).await? else {
            return Ok(StockAdjustment::Missing);
        };

        let net = release - reserve;
        if product.stock < -net {
            let available = product.stock.saturating_add(release);
            tracing::warn!(product_id = %id, available, reserve, "Insufficient stock");
            return Ok(StockAdjustment::Insufficient { available });
        }

        tracing::warn!(product_id = %id, stock = product.stock, net, "Stock overflow");
        Err(ProductError::StockOverflow {
            product_id: id.to_hex(),
            stock: product.stock,
            added: net,
        })
    }
}
