//! Product repository for database operations.
//!
//! Products are inserted once by the backfill path and deleted only by the
//! retention cleanup engine; there is no update path.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use woo_mirror_core::ProductId;

use super::RepositoryError;
use crate::models::{Product, ProductImage, TermRef};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    slug: String,
    permalink: String,
    date_created: Option<DateTime<Utc>>,
    date_modified: Option<DateTime<Utc>>,
    price: String,
    regular_price: String,
    sale_price: String,
    sku: String,
    stock_quantity: Option<i64>,
    stock_status: String,
    description: String,
    short_description: String,
    categories: Json<Vec<TermRef>>,
    tags: Json<Vec<TermRef>>,
    images: Json<Vec<ProductImage>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            slug: row.slug,
            permalink: row.permalink,
            date_created: row.date_created,
            date_modified: row.date_modified,
            price: row.price,
            regular_price: row.regular_price,
            sale_price: row.sale_price,
            sku: row.sku,
            stock_quantity: row.stock_quantity,
            stock_status: row.stock_status,
            description: row.description,
            short_description: row.short_description,
            categories: row.categories.0,
            tags: row.tags.0,
            images: row.images.0,
        }
    }
}

const SELECT_COLUMNS: &str = "id, name, slug, permalink, date_created, date_modified, \
     price, regular_price, sale_price, sku, stock_quantity, stock_status, \
     description, short_description, categories, tags, images";

/// Listing row: product columns plus the per-product order count subquery.
#[derive(Debug, sqlx::FromRow)]
struct CountedProductRow {
    #[sqlx(flatten)]
    product: ProductRow,
    order_count: i64,
}

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    /// Alphabetical (default).
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl ProductSort {
    /// Parse `sort_by`/`sort_order` query parameters (`name`/`price`,
    /// `asc`/`desc`). Unknown values fall back to the default.
    #[must_use]
    pub fn from_params(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        let descending = matches!(sort_order, Some("desc"));
        match (sort_by, descending) {
            (Some("price"), false) => Self::PriceAsc,
            (Some("price"), true) => Self::PriceDesc,
            (_, true) => Self::NameDesc,
            (_, false) => Self::NameAsc,
        }
    }

    // Remote price strings are decimal or empty, so the numeric cast is safe.
    const fn sql(self) -> &'static str {
        match self {
            Self::NameAsc => "name ASC, id ASC",
            Self::NameDesc => "name DESC, id DESC",
            Self::PriceAsc => "NULLIF(price, '')::numeric ASC NULLS LAST, id ASC",
            Self::PriceDesc => "NULLIF(price, '')::numeric DESC NULLS LAST, id DESC",
        }
    }
}

/// A product plus the number of mirrored orders referencing it.
#[derive(Debug)]
pub struct CountedProduct {
    pub product: Product,
    pub order_count: i64,
}

/// One page of a product listing, with the total match count.
#[derive(Debug)]
pub struct ProductPage {
    pub total: i64,
    pub products: Vec<CountedProduct>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product snapshot. Does nothing if the product already exists,
    /// so a snapshot is never refreshed once mirrored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO products (id, name, slug, permalink, date_created, date_modified,
                                  price, regular_price, sale_price, sku, stock_quantity,
                                  stock_status, description, short_description,
                                  categories, tags, images)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.permalink)
        .bind(product.date_created)
        .bind(product.date_modified)
        .bind(&product.price)
        .bind(&product.regular_price)
        .bind(&product.sale_price)
        .bind(&product.sku)
        .bind(product.stock_quantity)
        .bind(&product.stock_status)
        .bind(&product.description)
        .bind(&product.short_description)
        .bind(Json(&product.categories))
        .bind(Json(&product.tags))
        .bind(Json(&product.images))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get a mirrored product by its remote id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// Whether a product is already mirrored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    /// Delete a mirrored product. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List products for the read API, with optional case-insensitive
    /// name/SKU search. Each row carries the number of mirrored orders that
    /// reference it.
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
        search: Option<&str>,
        sort: ProductSort,
    ) -> Result<ProductPage, RepositoryError> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));

        let mut count_query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM products");
        if let Some(needle) = &needle {
            count_query.push(" WHERE (name ILIKE ");
            count_query.push_bind(needle.clone());
            count_query.push(" OR sku ILIKE ");
            count_query.push_bind(needle.clone());
            count_query.push(")");
        }
        let total: i64 = count_query.build_query_scalar().fetch_one(self.pool).await?;

        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {SELECT_COLUMNS}, \
             (SELECT COUNT(*) FROM orders o \
              WHERE o.line_items @> jsonb_build_array(jsonb_build_object('product_id', products.id))) \
             AS order_count \
             FROM products"
        ));
        if let Some(needle) = &needle {
            query.push(" WHERE (name ILIKE ");
            query.push_bind(needle.clone());
            query.push(" OR sku ILIKE ");
            query.push_bind(needle.clone());
            query.push(")");
        }
        query.push(format!(" ORDER BY {}", sort.sql()));
        query.push(" LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind((page - 1) * limit);

        let rows: Vec<CountedProductRow> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(ProductPage {
            total,
            products: rows
                .into_iter()
                .map(|row| CountedProduct {
                    product: row.product.into(),
                    order_count: row.order_count,
                })
                .collect(),
        })
    }

    /// Count all mirrored products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_sort_from_params() {
        assert_eq!(ProductSort::from_params(None, None), ProductSort::NameAsc);
        assert_eq!(
            ProductSort::from_params(Some("name"), Some("desc")),
            ProductSort::NameDesc
        );
        assert_eq!(
            ProductSort::from_params(Some("price"), None),
            ProductSort::PriceAsc
        );
        assert_eq!(
            ProductSort::from_params(Some("price"), Some("desc")),
            ProductSort::PriceDesc
        );
        assert_eq!(
            ProductSort::from_params(Some("bogus"), None),
            ProductSort::NameAsc
        );
    }
}
