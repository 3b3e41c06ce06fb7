//! Unified error handling for the mirror server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::SyncError;
use crate::woocommerce::WooError;

/// Application-level error type for the read API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// WooCommerce API operation failed.
    #[error("WooCommerce error: {0}")]
    WooCommerce(#[from] WooError),

    /// A sync or cleanup pass failed.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::WooCommerce(_) | Self::Sync(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Mirror request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) | Self::Sync(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::WooCommerce(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) | Self::Sync(_) => {
                "Internal server error".to_string()
            }
            Self::WooCommerce(_) => "Upstream store error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 501".to_string());
        assert_eq!(err.to_string(), "Not found: order 501");

        let err = AppError::BadRequest("invalid page".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid page");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
