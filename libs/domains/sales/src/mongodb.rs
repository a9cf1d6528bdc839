//! MongoDB implementation of SaleRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, oid::ObjectId},
    options::{FindOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::SaleResult;
use crate::models::{NewSale, Sale};
use crate::repository::SaleRepository;

/// MongoDB implementation of the SaleRepository
#[derive(Clone)]
pub struct MongoSaleRepository {
    collection: Collection<Sale>,
}

impl MongoSaleRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, "sales")
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Sale>(collection_name),
        }
    }

    /// Matches the sale only while it still holds the product and quantity
    /// that `current` was read with.
    fn current_filter(current: &Sale) -> Document {
        doc! {
            "_id": current.id,
            "product_id": current.product_id,
            "total_product": current.total_product,
        }
    }

    /// Index sales by the product they reference
    pub async fn init_indexes(&self) -> SaleResult<()> {
        let index = IndexModel::builder().keys(doc! { "product_id": 1 }).build();
        self.collection.create_index(index).await?;
        tracing::info!(collection = self.collection.name(), "Sale indexes ready");
        Ok(())
    }
}

#[async_trait]
impl SaleRepository for MongoSaleRepository {
    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    async fn create(&self, input: NewSale) -> SaleResult<Sale> {
        let sale = Sale::new(input);

        self.collection.insert_one(&sale).await?;

        tracing::info!(sale_id = %sale.id, "Sale created successfully");
        Ok(sale)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> SaleResult<Vec<Sale>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let sales: Vec<Sale> = cursor.try_collect().await?;
        Ok(sales)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> SaleResult<Option<Sale>> {
        let sale = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(sale)
    }

    #[instrument(skip(self, current, updated), fields(sale_id = %current.id))]
    async fn replace_if_current(&self, current: Sale, updated: Sale) -> SaleResult<Option<Sale>> {
        let updated = Sale {
            id: current.id,
            ..updated
        };
        let replaced = self
            .collection
            .find_one_and_replace(Self::current_filter(&current), &updated)
            .return_document(ReturnDocument::After)
            .await?;

        match replaced {
            Some(_) => {
                tracing::info!(product_id = %updated.product_id, "Sale updated successfully")
            }
            None => tracing::warn!("Sale changed or vanished before replace"),
        }
        Ok(replaced)
    }
}
