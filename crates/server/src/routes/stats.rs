//! Mirror statistics handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::db::{OrderRepository, ProductRepository};
use crate::error::AppError;
use crate::state::AppState;

/// Mirror counts.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub orders: i64,
    pub products: i64,
}

/// Report how much of the remote store is mirrored locally.
///
/// # Errors
///
/// Returns `AppError::Database` if a count query fails.
#[instrument(skip(state))]
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let orders = OrderRepository::new(state.pool()).count().await?;
    let products = ProductRepository::new(state.pool()).count().await?;

    Ok(Json(StatsResponse { orders, products }))
}
