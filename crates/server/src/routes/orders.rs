//! Mirrored order listing and detail handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use woo_mirror_core::{OrderId, ProductId};

use crate::db::{OrderFilter, OrderRepository, OrderSort};
use crate::error::AppError;
use crate::models::Order;
use crate::state::AppState;

use super::{Paginated, page_params};

/// Query parameters for the order listing.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matched against `search_text`; numeric input also matches the id.
    pub search: Option<String>,
    pub status: Option<String>,
    /// Only orders whose line items reference this product.
    pub product_id: Option<i64>,
    /// `date_created` (default) or `total`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_order: Option<String>,
}

/// List mirrored orders.
///
/// # Errors
///
/// Returns `AppError::Database` if the listing query fails.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Paginated<Order>>, AppError> {
    let (page, limit) = page_params(query.page, query.limit);
    let sort = OrderSort::from_params(query.sort_by.as_deref(), query.sort_order.as_deref());
    let filter = OrderFilter {
        search: query.search,
        status: query.status,
        product_id: query.product_id.map(ProductId::new),
    };

    let result = OrderRepository::new(state.pool())
        .list(page, limit, &filter, sort)
        .await?;

    Ok(Json(Paginated {
        total: result.total,
        page,
        limit,
        data: result.orders,
    }))
}

/// Fetch a single mirrored order.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the order is not mirrored.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Order>, AppError> {
    OrderRepository::new(state.pool())
        .get_by_id(OrderId::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}
