use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_products::ProductError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum SaleError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidFields(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Old product not found: {0}")]
    OldProductNotFound(String),

    #[error("New product not found: {0}")]
    NewProductNotFound(String),

    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    #[error("Stock overflow for product {product_id}: stock {stock}, adding {added}")]
    StockOverflow {
        product_id: String,
        stock: i64,
        added: i64,
    },

    /// Concurrent updates kept changing the sale until the retries ran out
    #[error("Sale {0} was modified concurrently")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type SaleResult<T> = Result<T, SaleError>;

impl From<ProductError> for SaleError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation(msg) => SaleError::Validation(msg),
            ProductError::InvalidFields(errors) => SaleError::InvalidFields(errors),
            ProductError::InvalidId(raw) => SaleError::InvalidId(raw),
            ProductError::NotFound(id) => SaleError::ProductNotFound(id),
            ProductError::StockOverflow {
                product_id,
                stock,
                added,
            } => SaleError::StockOverflow {
                product_id,
                stock,
                added,
            },
            ProductError::Database(e) => SaleError::Database(e),
        }
    }
}

impl From<SaleError> for AppError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::Validation(msg) => AppError::InvalidInput(msg),
            SaleError::InvalidFields(errors) => AppError::Validation(errors),
            SaleError::InvalidId(raw) => AppError::InvalidId(format!("invalid id: {raw}")),
            SaleError::SaleNotFound(_) => AppError::NotFound("sale not found".to_string()),
            SaleError::ProductNotFound(_) => AppError::NotFound("product not found".to_string()),
            SaleError::OldProductNotFound(_) => {
                AppError::NotFound("old product not found".to_string())
            }
            SaleError::NewProductNotFound(_) => {
                AppError::NotFound("new product not found".to_string())
            }
            SaleError::InsufficientStock {
                product_id,
                requested,
                available,
            } => AppError::RuleViolation {
                message: format!(
                    "insufficient stock: requested {requested}, available {available}"
                ),
                details: Some(serde_json::json!({
                    "product_id": product_id,
                    "requested": requested,
                    "available": available,
                })),
            },
            SaleError::StockOverflow {
                product_id,
                stock,
                added,
            } => AppError::RuleViolation {
                message: format!("stock overflow: {stock} plus {added} exceeds the maximum"),
                details: Some(serde_json::json!({
                    "product_id": product_id,
                    "stock": stock,
                    "added": added,
                })),
            },
            SaleError::Conflict(_) => AppError::Conflict(
                "sale was modified concurrently, retry the request".to_string(),
            ),
            SaleError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for SaleError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
