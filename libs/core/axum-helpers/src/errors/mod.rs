pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::error::ErrorKind as MongoErrorKind;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Every error response has this shape:
/// - `error`: human-readable message
/// - `code`: machine-readable identifier (e.g. `"NOT_FOUND"`)
/// - `details`: optional structured detail (e.g. per-field validation errors)
///
/// ```json
/// {
///   "error": "quantity must be a positive integer",
///   "code": "VALIDATION_ERROR",
///   "details": { "quantity": [{ "code": "range", "message": "quantity must be a positive integer", "params": {"min": 1, "value": 0} }] }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Machine-readable error identifier for programmatic handling
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own error enums into this type; the
/// conversion picks the variant and therefore the status code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Input rejected with a single message (e.g. "quantity is required")
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// Well-formed request that cannot be applied to the current state
    #[error("Rule violation: {message}")]
    RuleViolation {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    /// The resource changed underneath the request; retrying may succeed
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// Status code this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(_)
            | AppError::Validation(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidId(_)
            | AppError::RuleViolation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(e) => map_mongo_error(e).0,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidJson.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    e.body_text(),
                    None,
                    ErrorCode::InvalidJson,
                )
            }
            AppError::Validation(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    validation_message(&e),
                    serde_json::to_value(&e).ok(),
                    ErrorCode::ValidationError,
                )
            }
            AppError::InvalidInput(msg) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Invalid input: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::ValidationError)
            }
            AppError::InvalidId(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidId.code(), "Invalid id: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::InvalidId)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::RuleViolation { message, details } => {
                tracing::info!(
                    error_code = ErrorCode::RuleViolation.code(),
                    "Rule violation: {}",
                    message
                );
                (StatusCode::BAD_REQUEST, message, details, ErrorCode::RuleViolation)
            }
            AppError::Database(e) => {
                let (status, code) = map_mongo_error(&e);
                (status, code.default_message().to_string(), None, code)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg,
                    None,
                    ErrorCode::InternalError,
                )
            }
            AppError::Conflict(msg) => {
                tracing::warn!(error_code = ErrorCode::Conflict.code(), "Conflict: {}", msg);
                (StatusCode::CONFLICT, msg, None, ErrorCode::Conflict)
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code,
            details,
        });

        (status, body).into_response()
    }
}

/// Maps a MongoDB driver error to a status code and error code, logging it.
///
/// Server selection failures mean the deployment is unreachable and render as
/// 503; everything else is a 500.
fn map_mongo_error(error: &mongodb::error::Error) -> (StatusCode, ErrorCode) {
    match error.kind.as_ref() {
        MongoErrorKind::ServerSelection { .. } => {
            tracing::warn!(
                error_code = ErrorCode::DatabaseUnavailable.code(),
                "MongoDB server selection failed: {}",
                error
            );
            (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::DatabaseUnavailable)
        }
        _ => {
            tracing::error!(
                error_code = ErrorCode::DatabaseError.code(),
                "MongoDB error: {:?}",
                error
            );
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError)
        }
    }
}

/// Joins the per-field messages of `errors` into one sentence.
///
/// Fields are visited in name order so the text is stable. A rule without a
/// custom message reads as "`<field>` is invalid".
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();

    if messages.is_empty() {
        ErrorCode::ValidationError.default_message().to_string()
    } else {
        messages.join("; ")
    }
}

/// Helper function to create error responses.
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(
///     StatusCode::NOT_FOUND,
///     "The requested resource was not found".to_string(),
///     ErrorCode::NotFound,
/// );
/// ```
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        error: message,
        code: error_code,
        details: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    struct Order {
        #[validate(range(min = 1, message = "quantity must be a positive integer"))]
        quantity: i64,
        #[validate(length(min = 1))]
        note: String,
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_message_uses_custom_messages() {
        let order = Order {
            quantity: 0,
            note: "x".to_string(),
        };
        let errors = order.validate().unwrap_err();
        assert_eq!(validation_message(&errors), "quantity must be a positive integer");
    }

    #[test]
    fn test_validation_message_falls_back_to_field_name() {
        let order = Order {
            quantity: 0,
            note: String::new(),
        };
        let errors = order.validate().unwrap_err();
        assert_eq!(
            validation_message(&errors),
            "note is invalid; quantity must be a positive integer"
        );
    }

    #[tokio::test]
    async fn test_validation_error_response_shape() {
        let order = Order {
            quantity: -3,
            note: "x".to_string(),
        };
        let response = AppError::from(order.validate().unwrap_err()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "quantity must be a positive integer");
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert!(json["details"]["quantity"].is_array());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (AppError::InvalidId("bad".into()), StatusCode::BAD_REQUEST, "INVALID_ID"),
            (AppError::NotFound("gone".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                AppError::RuleViolation {
                    message: "insufficient stock".into(),
                    details: None,
                },
                StatusCode::BAD_REQUEST,
                "RULE_VIOLATION",
            ),
            (
                AppError::Conflict("sale changed concurrently".into()),
                StatusCode::CONFLICT,
                "CONFLICT",
            ),
            (
                AppError::InternalServerError("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status(), status);
            let response = error.into_response();
            assert_eq!(response.status(), status);
            let json = body_json(response).await;
            assert_eq!(json["code"], code);
            assert!(!json["error"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_not_found_omits_details() {
        let response = AppError::NotFound("sale not found".into()).into_response();
        let json = body_json(response).await;
        assert_eq!(json["error"], "sale not found");
        assert!(json.get("details").is_none());
    }
}
