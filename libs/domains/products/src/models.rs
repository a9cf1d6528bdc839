use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Product as stored in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub brand: String,
    pub stock: i64,
    pub price: f64,
}

impl Product {
    /// Build a product with a fresh ObjectId from validated fields.
    pub fn new(input: NewProduct) -> Self {
        Self {
            id: ObjectId::new(),
            name: input.name,
            brand: input.brand,
            stock: input.stock,
            price: input.price,
        }
    }

    /// Overlay the supplied fields of `changes` onto this product's fields.
    pub fn merged_with(&self, changes: &UpdateProduct) -> NewProduct {
        NewProduct {
            name: changes.name.clone().unwrap_or_else(|| self.name.clone()),
            brand: changes.brand.clone().unwrap_or_else(|| self.brand.clone()),
            stock: changes.stock.unwrap_or(self.stock),
            price: changes.price.unwrap_or(self.price),
        }
    }
}

/// Product fields after validation; every rule a stored product must satisfy.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub brand: String,
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: i64,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
}

/// Request body for creating a product
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    #[schema(example = "Galaxy S24")]
    pub name: Option<String>,

    #[validate(required(message = "brand is required"))]
    #[schema(example = "Samsung")]
    pub brand: Option<String>,

    #[validate(
        required(message = "stock is required"),
        range(min = 0, message = "stock must not be negative")
    )]
    #[schema(example = 25)]
    pub stock: Option<i64>,

    #[validate(
        required(message = "price is required"),
        range(min = 0.0, message = "price must not be negative")
    )]
    #[schema(example = 799.99)]
    pub price: Option<f64>,
}

/// Request body for updating a product; only supplied fields change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.brand.is_none() && self.stock.is_none() && self.price.is_none()
    }
}

/// Product as rendered by the API
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductResponse {
    /// 24-character hex ObjectId
    #[schema(example = "65f1c2a9e4b0a1b2c3d4e5f6")]
    pub id: String,
    pub name: String,
    pub brand: String,
    pub stock: i64,
    pub price: f64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_hex(),
            name: product.name,
            brand: product.brand,
            stock: product.stock,
            price: product.price,
        }
    }
}

/// Outcome of [`ProductRepository::adjust_stock`](crate::ProductRepository::adjust_stock)
#[derive(Debug, Clone, PartialEq)]
pub enum StockAdjustment {
    /// The adjustment was written; carries the product after the update
    Applied(Product),
    /// `stock + release < reserve`; nothing was written
    Insufficient { available: i64 },
    /// No product with that id
    Missing,
}
