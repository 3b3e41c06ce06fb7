//! In-memory fakes for the sync and cleanup engine tests.
#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use woo_mirror_core::{OrderId, ProductId};

use crate::db::RepositoryError;
use crate::models::{Order, Product};
use crate::woocommerce::{OrderWindow, RemoteOrder, WooError};

use super::{MirrorStore, RemoteSource};

/// Scripted remote: serves a fixed sequence of order pages and synthesizes
/// product snapshots on demand, except for ids marked missing.
#[derive(Default)]
pub struct FakeRemote {
    pages: Vec<Vec<RemoteOrder>>,
    missing_products: BTreeSet<i64>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, orders: Vec<RemoteOrder>) -> Self {
        self.pages.push(orders);
        self
    }

    pub fn without_product(mut self, id: i64) -> Self {
        self.missing_products.insert(id);
        self
    }
}

#[async_trait]
impl RemoteSource for FakeRemote {
    async fn list_orders(
        &self,
        page: u32,
        _window: OrderWindow,
    ) -> Result<Vec<RemoteOrder>, WooError> {
        Ok(self
            .pages
            .get(usize::try_from(page).unwrap() - 1)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product, WooError> {
        if self.missing_products.contains(&id.as_i64()) {
            return Err(WooError::NotFound(format!("products/{id}")));
        }
        Ok(Product {
            id,
            name: format!("Product {id}"),
            ..Product::default()
        })
    }
}

/// In-memory mirror store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    orders: BTreeMap<i64, Order>,
    products: BTreeMap<i64, Product>,
    fail_product_lookups: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_order(&self, order: Order) {
        self.inner.lock().unwrap().orders.insert(order.id.as_i64(), order);
    }

    pub fn seed_product(&self, product: Product) {
        self.inner
            .lock()
            .unwrap()
            .products
            .insert(product.id.as_i64(), product);
    }

    pub fn order_count(&self) -> usize {
        self.inner.lock().unwrap().orders.len()
    }

    pub fn product_count(&self) -> usize {
        self.inner.lock().unwrap().products.len()
    }

    pub fn has_product(&self, id: i64) -> bool {
        self.inner.lock().unwrap().products.contains_key(&id)
    }

    /// Make every subsequent `product_exists` call fail, simulating the
    /// store going away mid-pass.
    pub fn fail_product_lookups(&self) {
        self.inner.lock().unwrap().fail_product_lookups = true;
    }
}

#[async_trait]
impl MirrorStore for MemoryStore {
    async fn upsert_order(&self, order: &Order) -> Result<(), RepositoryError> {
        self.inner
            .lock()
            .unwrap()
            .orders
            .insert(order.id.as_i64(), order.clone());
        Ok(())
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.inner.lock().unwrap().orders.get(&id.as_i64()).cloned())
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .orders
            .remove(&id.as_i64())
            .is_some())
    }

    async fn count_orders_referencing(&self, id: ProductId) -> Result<i64, RepositoryError> {
        let count = self
            .inner
            .lock()
            .unwrap()
            .orders
            .values()
            .filter(|order| order.line_items.iter().any(|item| item.product_id == id))
            .count();
        Ok(i64::try_from(count).unwrap())
    }

    async fn product_exists(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_product_lookups {
            return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
        }
        Ok(inner.products.contains_key(&id.as_i64()))
    }

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        self.inner
            .lock()
            .unwrap()
            .products
            .entry(product.id.as_i64())
            .or_insert_with(|| product.clone());
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .products
            .remove(&id.as_i64())
            .is_some())
    }
}
