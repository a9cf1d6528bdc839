//! Type-safe error codes for API responses.
//!
//! Each code has a string form sent to clients (e.g. `"VALIDATION_ERROR"`),
//! an integer for logs and monitoring (e.g. `1001`) and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Request validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Identifier in the path is not a well-formed ObjectId
    InvalidId,

    /// Request body is not valid JSON for the expected shape
    InvalidJson,

    /// Requested resource was not found
    NotFound,

    /// Request is well-formed but breaks a business rule (e.g. not enough stock)
    RuleViolation,

    /// The resource was modified by a concurrent request
    Conflict,

    // Server errors
    InternalError,

    // Database errors (2000-2999)
    /// Query or command failed
    DatabaseError,

    /// No server could be selected within the configured timeout
    DatabaseUnavailable,
}

impl ErrorCode {
    /// String representation for client consumption.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::RuleViolation => "RULE_VIOLATION",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Conflict => "CONFLICT",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
        }
    }

    /// Integer code for logging and monitoring.
    ///
    /// - 1000-1999: Client and generic server errors
    /// - 2000-2999: Database errors
    ///
    /// ```rust
    /// use axum_helpers::errors::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::NotFound.code(), 1004);
    /// assert_eq!(ErrorCode::DatabaseError.code(), 2001);
    /// ```
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::InvalidJson => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::RuleViolation => 1006,
            Self::Conflict => 1007,

            Self::DatabaseError => 2001,
            Self::DatabaseUnavailable => 2002,
        }
    }

    /// Default user-facing message, used when a variant carries no text of its own.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid id format",
            Self::InvalidJson => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::RuleViolation => "Request cannot be fulfilled",
            Self::InternalError => "An internal server error occurred",
            Self::Conflict => "Resource was modified concurrently",
            Self::DatabaseError => "A database error occurred",
            Self::DatabaseUnavailable => "Database is unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
