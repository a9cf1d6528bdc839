use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidFields(#[from] ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Product not found: {0}")]
    NotFound(String),

    /// The adjustment would push stock past `i64::MAX`
    #[error("Stock overflow for product {product_id}: stock {stock}, adding {added}")]
    StockOverflow {
        product_id: String,
        stock: i64,
        added: i64,
    },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation(msg) => AppError::InvalidInput(msg),
            ProductError::InvalidFields(errors) => AppError::Validation(errors),
            ProductError::InvalidId(raw) => AppError::InvalidId(format!("invalid id: {raw}")),
            ProductError::NotFound(_) => AppError::NotFound("product not found".to_string()),
            ProductError::StockOverflow {
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
            ProductError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ProductError::Validation("name is required".into()), StatusCode::BAD_REQUEST),
            (ProductError::InvalidId("xyz".into()), StatusCode::BAD_REQUEST),
            (ProductError::NotFound("abc".into()), StatusCode::NOT_FOUND),
            (
                ProductError::StockOverflow {
                    product_id: "abc".into(),
                    stock: i64::MAX,
                    added: 1,
                },
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
