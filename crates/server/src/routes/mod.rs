//! HTTP route handlers for the read API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database reachable)
//!
//! # Read API (JSON, never mutates the mirror)
//! GET  /api/v1                 - Liveness message
//! GET  /api/v1/orders          - Mirrored order listing
//! GET  /api/v1/orders/{id}     - Mirrored order detail
//! GET  /api/v1/products        - Mirrored product listing
//! GET  /api/v1/products/{id}   - Mirrored product detail
//! GET  /api/v1/stats           - Mirror counts
//! ```

pub mod orders;
pub mod products;
pub mod stats;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use serde_json::json;

use crate::state::AppState;

/// Default page size for listings.
pub const DEFAULT_LIMIT: i64 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: i64 = 100;

/// Envelope for paginated listings.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub data: Vec<T>,
}

/// Normalize `page`/`limit` query parameters.
#[must_use]
pub fn page_params(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (
        page.unwrap_or(1).max(1),
        limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
    )
}

/// Build the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .route("/api/v1", get(api_root))
        .route("/api/v1/orders", get(orders::list))
        .route("/api/v1/orders/{id}", get(orders::detail))
        .route("/api/v1/products", get(products::list))
        .route("/api/v1/products/{id}", get(products::detail))
        .route("/api/v1/stats", get(stats::stats))
}

/// Liveness check.
async fn health() -> &'static str {
    "OK"
}

/// Readiness check: verifies the database is reachable.
async fn ready(State(state): State<AppState>) -> StatusCode {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.pool())
        .await
    {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// API root liveness message.
async fn api_root() -> Json<serde_json::Value> {
    Json(json!({ "message": "woo-mirror read API" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults() {
        assert_eq!(page_params(None, None), (1, DEFAULT_LIMIT));
    }

    #[test]
    fn test_page_params_clamping() {
        assert_eq!(page_params(Some(0), Some(0)), (1, 1));
        assert_eq!(page_params(Some(-3), Some(10_000)), (1, MAX_LIMIT));
        assert_eq!(page_params(Some(4), Some(25)), (4, 25));
    }
}
