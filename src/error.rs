//! Application error type and its HTTP mapping.
//!
//! Every failure that reaches a handler is an [`AppError`]. Each variant maps
//! to one status code and a stable machine-readable `code`:
//!
//! | Variant         | Status | Code               |
//! |-----------------|--------|--------------------|
//! | `Validation`    | 400    | `validation_error` |
//! | `NotFound`      | 404    | `not_found`        |
//! | `RateLimited`   | 429    | `rate_limited`     |
//! | `SlugExhausted` | 500    | `slug_exhausted`   |
//! | `Internal`      | 500    | `internal_error`   |

use std::time::Duration;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("Rate limit exceeded")]
    RateLimited { retry_after: Duration },

    #[error("Failed to generate unique slug after {attempts} attempts")]
    SlugExhausted { attempts: usize },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn rate_limited(retry_after: Duration) -> Self {
        Self::RateLimited { retry_after }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::SlugExhausted { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into the client-facing payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, details) = match self {
            Self::Validation { details, .. } => ("validation_error", details.clone()),
            Self::NotFound { details, .. } => ("not_found", details.clone()),
            Self::RateLimited { retry_after } => (
                "rate_limited",
                json!({ "retry_after_seconds": retry_after_seconds(*retry_after) }),
            ),
            Self::SlugExhausted { attempts } => ("slug_exhausted", json!({ "attempts": attempts })),
            Self::Internal { details, .. } => ("internal_error", details.clone()),
        };

        ErrorInfo {
            code,
            message: self.to_string(),
            details,
        }
    }
}

/// Rounds a retry hint up to whole seconds, never below one.
fn retry_after_seconds(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();

        if let Self::RateLimited { retry_after } = self {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(retry_after_seconds(retry_after)),
            );
        }

        response
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { slug } => {
                AppError::not_found("Short link not found", json!({ "slug": slug }))
            }
            StoreError::DuplicateSlug { .. } => AppError::internal(
                "Failed to generate unique slug",
                json!({ "reason": "Slug was claimed concurrently" }),
            ),
            other => {
                tracing::error!(error = %other, "Store operation failed");
                AppError::internal("Database error", json!({}))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let message = e
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request".to_string());

        AppError::bad_request(message, json!({ "fields": e.to_string() }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::bad_request("Invalid request payload", json!({ "reason": e.body_text() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("x", json!({})).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::rate_limited(Duration::from_secs(3)).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::SlugExhausted { attempts: 10 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: AppError = StoreError::not_found("abc123").into();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_store_failure_hides_raw_error_text() {
        let err: AppError = StoreError::Database("relation \"links\" does not exist".into()).into();
        let info = err.to_error_info();

        assert_eq!(info.code, "internal_error");
        assert!(!info.message.contains("relation"));
        assert_eq!(info.details, json!({}));
    }

    #[test]
    fn test_rate_limited_sets_retry_after_header() {
        let response = AppError::rate_limited(Duration::from_millis(2500)).into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "3");
    }

    #[test]
    fn test_retry_after_never_zero() {
        assert_eq!(retry_after_seconds(Duration::ZERO), 1);
        assert_eq!(retry_after_seconds(Duration::from_secs(10)), 10);
    }
}
