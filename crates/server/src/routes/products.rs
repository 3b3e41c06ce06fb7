//! Mirrored product listing and detail handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use woo_mirror_core::ProductId;

use crate::db::{OrderRepository, ProductRepository, ProductSort};
use crate::error::AppError;
use crate::models::Product;
use crate::state::AppState;

use super::{Paginated, page_params};

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matched case-insensitively against name and SKU.
    pub search: Option<String>,
    /// `name` (default) or `price`.
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub sort_order: Option<String>,
}

/// A product row augmented with its local order count.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub order_count: i64,
}

/// List mirrored products.
///
/// # Errors
///
/// Returns `AppError::Database` if the listing query fails.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Paginated<ProductView>>, AppError> {
    let (page, limit) = page_params(query.page, query.limit);
    let sort = ProductSort::from_params(query.sort_by.as_deref(), query.sort_order.as_deref());

    let result = ProductRepository::new(state.pool())
        .list(page, limit, query.search.as_deref(), sort)
        .await?;

    Ok(Json(Paginated {
        total: result.total,
        page,
        limit,
        data: result
            .products
            .into_iter()
            .map(|counted| ProductView {
                product: counted.product,
                order_count: counted.order_count,
            })
            .collect(),
    }))
}

/// Fetch a single mirrored product, with its local order count.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product is not mirrored.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductView>, AppError> {
    let product_id = ProductId::new(id);
    let product = ProductRepository::new(state.pool())
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let order_count = OrderRepository::new(state.pool())
        .count_referencing_product(product_id)
        .await?;

    Ok(Json(ProductView {
        product,
        order_count,
    }))
}
