//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "error": "A database error occurred",
        "code": "DATABASE_ERROR"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "error": "quantity must be a positive integer",
        "code": "VALIDATION_ERROR",
        "details": {
            "quantity": [{
                "code": "range",
                "message": "quantity must be a positive integer",
                "params": {"min": 1, "value": 0}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Malformed id",
    content_type = "application/json",
    example = json!({
        "error": "invalid id: not-an-object-id",
        "code": "INVALID_ID"
    })
)]
pub struct BadRequestInvalidIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Insufficient stock",
    content_type = "application/json",
    example = json!({
        "error": "insufficient stock",
        "code": "RULE_VIOLATION",
        "details": {
            "product_id": "65f1c2a9e4b0a1b2c3d4e5f6",
            "requested": 5,
            "available": 2
        }
    })
)]
pub struct InsufficientStockResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "error": "product not found",
        "code": "NOT_FOUND"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable",
    content_type = "application/json",
    example = json!({
        "error": "Database is unavailable",
        "code": "DATABASE_UNAVAILABLE"
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Modified concurrently",
    content_type = "application/json",
    example = json!({
        "error": "sale was modified concurrently, retry the request",
        "code": "CONFLICT"
    })
)]
pub struct ConflictResponse(pub ErrorResponse);
