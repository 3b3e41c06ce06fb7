//! Sync and retention services.
//!
//! The engines are generic over two seams so they can be driven by fakes in
//! tests: [`RemoteSource`] (the upstream store) and [`MirrorStore`] (the
//! local database). Production wires them to [`WooClient`] and [`sqlx::PgPool`].

pub mod cleanup;
#[cfg(test)]
pub(crate) mod fakes;
pub mod sync;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use woo_mirror_core::{OrderId, ProductId};

use crate::db::{OrderRepository, ProductRepository, RepositoryError};
use crate::models::{Order, Product};
use crate::woocommerce::{OrderWindow, RemoteOrder, WooClient, WooError};

pub use cleanup::CleanupSummary;
pub use sync::{SyncService, SyncSummary, search_text};

/// Errors from a sync or cleanup pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The upstream store could not be read.
    #[error("remote error: {0}")]
    Remote(#[from] WooError),

    /// The local mirror could not be read or written.
    #[error("store error: {0}")]
    Store(#[from] RepositoryError),
}

/// Read access to the upstream store.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// List one page of orders created inside `window`, oldest first.
    /// `page` is 1-indexed; an empty page ends the listing.
    async fn list_orders(
        &self,
        page: u32,
        window: OrderWindow,
    ) -> Result<Vec<RemoteOrder>, WooError>;

    /// Fetch a single product snapshot.
    async fn fetch_product(&self, id: ProductId) -> Result<Product, WooError>;
}

#[async_trait]
impl RemoteSource for WooClient {
    async fn list_orders(
        &self,
        page: u32,
        window: OrderWindow,
    ) -> Result<Vec<RemoteOrder>, WooError> {
        Self::list_orders(self, page, window).await
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product, WooError> {
        Self::fetch_product(self, id).await
    }
}

/// Write access to the local mirror.
#[async_trait]
pub trait MirrorStore: Send + Sync {
    /// Insert or fully replace a mirrored order.
    async fn upsert_order(&self, order: &Order) -> Result<(), RepositoryError>;

    /// Look up a mirrored order by its remote id.
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Delete a mirrored order. Returns whether a row was removed.
    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError>;

    /// Count orders whose line items reference the given product.
    async fn count_orders_referencing(&self, id: ProductId) -> Result<i64, RepositoryError>;

    /// Whether a product is already mirrored.
    async fn product_exists(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// Insert a product snapshot (no-op if already mirrored).
    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError>;

    /// Delete a mirrored product. Returns whether a row was removed.
    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError>;
}

#[async_trait]
impl MirrorStore for PgPool {
    async fn upsert_order(&self, order: &Order) -> Result<(), RepositoryError> {
        OrderRepository::new(self).upsert(order).await
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        OrderRepository::new(self).get_by_id(id).await
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError> {
        OrderRepository::new(self).delete(id).await
    }

    async fn count_orders_referencing(&self, id: ProductId) -> Result<i64, RepositoryError> {
        OrderRepository::new(self).count_referencing_product(id).await
    }

    async fn product_exists(&self, id: ProductId) -> Result<bool, RepositoryError> {
        ProductRepository::new(self).exists(id).await
    }

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        ProductRepository::new(self).insert(product).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        ProductRepository::new(self).delete(id).await
    }
}
