//! Shared API types
//!
//! Error envelope and the common query parameter validators.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::ValidationError;

use crate::core::constants::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use crate::domain::ListingError;

/// Validator function for limit parameter
pub fn validate_limit(limit: u32) -> Result<(), ValidationError> {
    if limit == 0 || limit > MAX_SEARCH_LIMIT {
        return Err(ValidationError::new("limit_range")
            .with_message(format!("Limit must be between 1 and {}", MAX_SEARCH_LIMIT).into()));
    }
    Ok(())
}

/// Validator function for the minimum bedrooms parameter
pub fn validate_bedrooms(bedrooms: i64) -> Result<(), ValidationError> {
    if bedrooms < 0 || bedrooms > i64::from(u32::MAX) {
        return Err(ValidationError::new("bedrooms_range")
            .with_message(format!("bedrooms must be between 0 and {}", u32::MAX).into()));
    }
    Ok(())
}

pub fn default_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    NotFound { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Map a listing failure; transient store errors surface as 503
    pub fn from_listing(e: ListingError) -> Self {
        match e {
            ListingError::StoreUnavailable => {
                Self::service_unavailable("Database not available")
            }
            ListingError::Store(e) if e.is_transient() => {
                tracing::warn!(error = %e, backend = e.backend(), "Store temporarily unavailable");
                Self::service_unavailable("Database temporarily unavailable")
            }
            ListingError::Store(e) => {
                tracing::error!(error = %e, backend = e.backend(), "Store error");
                Self::internal("Database operation failed")
            }
        }
    }
}

impl From<ListingError> for ApiError {
    fn from(e: ListingError) -> Self {
        Self::from_listing(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}
