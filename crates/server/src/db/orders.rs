//! Order repository for database operations.
//!
//! Orders are written wholesale by the sync engine (upsert by remote id) and
//! removed only by the retention cleanup engine. Addresses and line items are
//! stored as JSONB, so reference lookups use containment queries against the
//! GIN index on `line_items`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use woo_mirror_core::{CustomerId, OrderId, ProductId};

use super::RepositoryError;
use crate::models::{Address, LineItem, Order};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    number: String,
    order_key: String,
    status: String,
    date_created: Option<DateTime<Utc>>,
    date_modified: Option<DateTime<Utc>>,
    total: String,
    total_amount: Decimal,
    customer_id: i64,
    customer_note: String,
    billing: Json<Address>,
    shipping: Json<Address>,
    line_items: Json<Vec<LineItem>>,
    search_text: String,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            number: row.number,
            order_key: row.order_key,
            status: row.status,
            date_created: row.date_created,
            date_modified: row.date_modified,
            total: row.total,
            total_amount: row.total_amount,
            customer_id: CustomerId::new(row.customer_id),
            customer_note: row.customer_note,
            billing: row.billing.0,
            shipping: row.shipping.0,
            line_items: row.line_items.0,
            search_text: row.search_text,
        }
    }
}

const SELECT_COLUMNS: &str = "id, number, order_key, status, date_created, date_modified, \
     total, total_amount, customer_id, customer_note, billing, shipping, line_items, search_text";

// =============================================================================
// Query Parameters
// =============================================================================

/// Sort order for order listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSort {
    /// Newest first (default).
    #[default]
    DateCreatedDesc,
    /// Oldest first.
    DateCreatedAsc,
    /// Highest total first.
    TotalDesc,
    /// Lowest total first.
    TotalAsc,
}

impl OrderSort {
    /// Parse `sort_by`/`sort_order` query parameters (`date_created`/`total`,
    /// `asc`/`desc`). Unknown values fall back to the default.
    #[must_use]
    pub fn from_params(sort: Option<&str>, order: Option<&str>) -> Self {
        let ascending = matches!(order, Some("asc"));
        match (sort, ascending) {
            (Some("total"), true) => Self::TotalAsc,
            (Some("total"), false) => Self::TotalDesc,
            (_, true) => Self::DateCreatedAsc,
            (_, false) => Self::DateCreatedDesc,
        }
    }

    const fn sql(self) -> &'static str {
        match self {
            Self::DateCreatedDesc => "date_created DESC NULLS LAST, id DESC",
            Self::DateCreatedAsc => "date_created ASC NULLS LAST, id ASC",
            Self::TotalDesc => "total_amount DESC, id DESC",
            Self::TotalAsc => "total_amount ASC, id ASC",
        }
    }
}

/// Filters for order listings.
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    /// Free-text search. Matched case-insensitively against `search_text`;
    /// numeric input is additionally matched against the order id.
    pub search: Option<String>,
    /// Exact status filter (e.g. `processing`, `completed`).
    pub status: Option<String>,
    /// Only orders whose line items reference this product.
    pub product_id: Option<ProductId>,
}

impl OrderFilter {
    fn push_where(&self, query: &mut QueryBuilder<'_, Postgres>) {
        let mut prefix = " WHERE ";

        if let Some(raw) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            query.push(prefix);
            prefix = " AND ";
            query.push("(search_text LIKE ");
            query.push_bind(format!("%{}%", raw.to_lowercase()));
            if let Ok(id) = raw.parse::<i64>() {
                query.push(" OR id = ");
                query.push_bind(id);
            }
            query.push(")");
        }

        if let Some(status) = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            query.push(prefix);
            prefix = " AND ";
            query.push("status = ");
            query.push_bind(status.to_string());
        }

        if let Some(product_id) = self.product_id {
            query.push(prefix);
            query.push(
                "line_items @> jsonb_build_array(jsonb_build_object('product_id', ",
            );
            query.push_bind(product_id);
            query.push("::bigint))");
        }
    }
}

/// One page of an order listing, with the total match count.
#[derive(Debug)]
pub struct OrderPage {
    pub total: i64,
    pub orders: Vec<Order>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or fully replace a mirrored order by its remote id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO orders (id, number, order_key, status, date_created, date_modified,
                                total, total_amount, customer_id, customer_note,
                                billing, shipping, line_items, search_text)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                number = EXCLUDED.number,
                order_key = EXCLUDED.order_key,
                status = EXCLUDED.status,
                date_created = EXCLUDED.date_created,
                date_modified = EXCLUDED.date_modified,
                total = EXCLUDED.total,
                total_amount = EXCLUDED.total_amount,
                customer_id = EXCLUDED.customer_id,
                customer_note = EXCLUDED.customer_note,
                billing = EXCLUDED.billing,
                shipping = EXCLUDED.shipping,
                line_items = EXCLUDED.line_items,
                search_text = EXCLUDED.search_text
            ",
        )
        .bind(order.id)
        .bind(&order.number)
        .bind(&order.order_key)
        .bind(&order.status)
        .bind(order.date_created)
        .bind(order.date_modified)
        .bind(&order.total)
        .bind(order.total_amount)
        .bind(order.customer_id)
        .bind(&order.customer_note)
        .bind(Json(&order.billing))
        .bind(Json(&order.shipping))
        .bind(Json(&order.line_items))
        .bind(&order.search_text)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get a mirrored order by its remote id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a mirrored order. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count orders whose line items reference the given product.
    ///
    /// Uses JSONB containment against the GIN index on `line_items`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_referencing_product(
        &self,
        product_id: ProductId,
    ) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM orders
            WHERE line_items @> jsonb_build_array(jsonb_build_object('product_id', $1::bigint))
            ",
        )
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// List orders for the read API.
    ///
    /// `page` is 1-indexed; `limit` is clamped by the caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        page: i64,
        limit: i64,
        filter: &OrderFilter,
        sort: OrderSort,
    ) -> Result<OrderPage, RepositoryError> {
        let mut count_query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM orders");
        filter.push_where(&mut count_query);
        let total: i64 = count_query.build_query_scalar().fetch_one(self.pool).await?;

        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {SELECT_COLUMNS} FROM orders"));
        filter.push_where(&mut query);
        query.push(format!(" ORDER BY {}", sort.sql()));
        query.push(" LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind((page - 1) * limit);

        let rows: Vec<OrderRow> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(OrderPage {
            total,
            orders: rows.into_iter().map(Into::into).collect(),
        })
    }

    /// Count all mirrored orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_sort_from_params() {
        assert_eq!(OrderSort::from_params(None, None), OrderSort::DateCreatedDesc);
        assert_eq!(
            OrderSort::from_params(Some("date_created"), Some("asc")),
            OrderSort::DateCreatedAsc
        );
        assert_eq!(
            OrderSort::from_params(Some("total"), Some("desc")),
            OrderSort::TotalDesc
        );
        assert_eq!(
            OrderSort::from_params(Some("total"), Some("asc")),
            OrderSort::TotalAsc
        );
        // Unknown sort key falls back to date ordering
        assert_eq!(
            OrderSort::from_params(Some("bogus"), None),
            OrderSort::DateCreatedDesc
        );
    }
}
