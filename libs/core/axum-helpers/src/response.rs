//! JSON envelopes for successful responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// `{ "message": ..., "data": ... }` wrapper used by every resource endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    /// 200 with this envelope.
    pub fn ok(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::OK, Json(Self::new(message, data)))
    }

    /// 201 with this envelope.
    pub fn created(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Json(Self::new(message, data)))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Result of a delete: `{ "message": ..., "deleted_count": n }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted_count: u64,
}

impl DeleteResponse {
    pub fn new(message: impl Into<String>, deleted_count: u64) -> Self {
        Self {
            message: message.into(),
            deleted_count,
        }
    }
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// A bare `{ "message": ... }` body.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_serializes_envelope() {
        let body = ApiResponse::new("Product created", serde_json::json!({"id": "abc"}));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Product created");
        assert_eq!(json["data"]["id"], "abc");
    }

    #[test]
    fn test_created_sets_status() {
        let (status, _) = ApiResponse::created("Sale created", 1);
        assert_eq!(status, StatusCode::CREATED);
    }

    #[test]
    fn test_delete_response_shape() {
        let json = serde_json::to_value(DeleteResponse::new("Products deleted", 0)).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Products deleted", "deleted_count": 0}));
    }
}
