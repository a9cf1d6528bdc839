use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Sale as stored in the `sales` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub product_id: ObjectId,
    pub total_product: i64,
    pub total_price: f64,
}

impl Sale {
    pub fn new(input: NewSale) -> Self {
        Self {
            id: ObjectId::new(),
            product_id: input.product_id,
            total_product: input.total_product,
            total_price: input.total_price,
        }
    }
}

/// A priced sale ready to be recorded
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub product_id: ObjectId,
    pub total_product: i64,
    pub total_price: f64,
}

/// Request body for creating or updating a sale
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct SaleRequest {
    /// 24-character hex ObjectId of the product sold
    #[validate(required(message = "product_id is required"))]
    #[schema(example = "65f1c2a9e4b0a1b2c3d4e5f6")]
    pub product_id: Option<String>,

    #[validate(
        required(message = "quantity is required"),
        range(min = 1, message = "quantity must be a positive integer")
    )]
    #[schema(example = 2)]
    pub quantity: Option<i64>,
}

impl SaleRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            product_id: Some(product_id.into()),
            quantity: Some(quantity),
        }
    }
}

/// Sale as rendered by the API
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SaleResponse {
    #[schema(example = "65f1c2a9e4b0a1b2c3d4e5f7")]
    pub id: String,
    #[schema(example = "65f1c2a9e4b0a1b2c3d4e5f6")]
    pub product_id: String,
    pub total_product: i64,
    pub total_price: f64,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        Self {
            id: sale.id.to_hex(),
            product_id: sale.product_id.to_hex(),
            total_product: sale.total_product,
            total_price: sale.total_price,
        }
    }
}
