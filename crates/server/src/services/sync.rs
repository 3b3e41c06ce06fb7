//! Incremental order sync engine.
//!
//! Walks the remote order listing page by page inside a lookback window,
//! backfills any products the incoming orders reference, and upserts each
//! order wholesale into the mirror. Re-running a pass is idempotent: orders
//! are replaced by remote id and product snapshots are inserted at most once.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use tracing::instrument;

use woo_mirror_core::parse_total;

use crate::config::SyncConfig;
use crate::models::Order;
use crate::woocommerce::{OrderWindow, RemoteOrder};

use super::{MirrorStore, RemoteSource, SyncError};

/// Outcome of one sync pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    /// Orders upserted into the mirror.
    pub orders_synced: u64,
    /// Product snapshots newly mirrored.
    pub products_backfilled: u64,
    /// Products whose backfill failed and was skipped.
    pub product_failures: u64,
    /// Remote pages consumed.
    pub pages_fetched: u64,
}

/// Sync and retention engine, generic over the remote source and the mirror
/// store.
pub struct SyncService<R, S> {
    remote: R,
    store: S,
    lookback_days: i64,
    deletion_threshold_days: i64,
}

impl<R: RemoteSource, S: MirrorStore> SyncService<R, S> {
    /// Create a new sync service.
    #[must_use]
    pub const fn new(remote: R, store: S, config: &SyncConfig) -> Self {
        Self {
            remote,
            store,
            lookback_days: config.lookback_days,
            deletion_threshold_days: config.deletion_threshold_days,
        }
    }

    pub(super) const fn remote(&self) -> &R {
        &self.remote
    }

    pub(super) const fn store(&self) -> &S {
        &self.store
    }

    pub(super) const fn deletion_threshold_days(&self) -> i64 {
        self.deletion_threshold_days
    }

    /// Run one incremental sync pass.
    ///
    /// Pages through remote orders created inside the lookback window, oldest
    /// first, until an empty page. Each order is upserted first, then its
    /// referenced products are backfilled, so an order stays committed even
    /// when the pass dies during the backfill that follows it.
    ///
    /// A product that cannot be backfilled (deleted upstream, transient
    /// failure) is logged and skipped; the order has already synced. Listing
    /// and store failures abort the pass.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` if a page cannot be listed or the mirror cannot
    /// be written.
    #[instrument(skip(self))]
    pub async fn sync_orders(&self) -> Result<SyncSummary, SyncError> {
        let window = OrderWindow::created_after(Utc::now() - Duration::days(self.lookback_days));
        let mut summary = SyncSummary::default();
        let mut page = 1;

        loop {
            let orders = self.remote.list_orders(page, window).await?;
            if orders.is_empty() {
                break;
            }
            summary.pages_fetched += 1;

            for remote_order in orders {
                let order = normalize_order(remote_order);
                self.store.upsert_order(&order).await?;
                summary.orders_synced += 1;

                self.backfill_products(&order, &mut summary).await?;
            }

            page += 1;
        }

        tracing::info!(
            orders_synced = summary.orders_synced,
            products_backfilled = summary.products_backfilled,
            product_failures = summary.product_failures,
            pages_fetched = summary.pages_fetched,
            "Order sync pass complete"
        );

        Ok(summary)
    }

    /// Mirror every product the order references that is not yet local.
    ///
    /// Failures are per-product: a fetch or insert error is logged and the
    /// remaining products still get their attempt.
    async fn backfill_products(
        &self,
        order: &Order,
        summary: &mut SyncSummary,
    ) -> Result<(), SyncError> {
        let product_ids: BTreeSet<_> = order
            .line_items
            .iter()
            .filter(|item| item.references_product())
            .map(|item| item.product_id)
            .collect();

        for product_id in product_ids {
            if self.store.product_exists(product_id).await? {
                continue;
            }

            match self.fetch_and_insert(product_id).await {
                Ok(()) => summary.products_backfilled += 1,
                Err(err) => {
                    summary.product_failures += 1;
                    tracing::warn!(
                        product_id = %product_id,
                        order_id = %order.id,
                        error = %err,
                        "Product backfill failed, order synced without it"
                    );
                }
            }
        }

        Ok(())
    }

    async fn fetch_and_insert(
        &self,
        product_id: woo_mirror_core::ProductId,
    ) -> Result<(), SyncError> {
        let product = self.remote.fetch_product(product_id).await?;
        self.store.insert_product(&product).await?;
        Ok(())
    }
}

/// Turn a remote order into its mirrored form, deriving `total_amount` and
/// `search_text`.
#[must_use]
pub fn normalize_order(remote: RemoteOrder) -> Order {
    let total_amount = parse_total(&remote.total);
    let text = search_text(&remote);

    Order {
        id: remote.id,
        number: remote.number,
        order_key: remote.order_key,
        status: remote.status,
        date_created: remote.date_created,
        date_modified: remote.date_modified,
        total: remote.total,
        total_amount,
        customer_id: remote.customer_id,
        customer_note: remote.customer_note,
        billing: remote.billing,
        shipping: remote.shipping,
        line_items: remote.line_items,
        search_text: text,
    }
}

/// Derive the lowercase search haystack for an order.
///
/// Joins billing names, shipping names, line item names and the order number
/// with single spaces, lowercased and trimmed at the ends only. Blank name
/// fields leave their gaps in place, so the stored string is stable across
/// syncs regardless of which fields the remote filled in.
#[must_use]
pub fn search_text(order: &RemoteOrder) -> String {
    let item_names = order
        .line_items
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let joined = format!(
        "{} {} {} {} {} {}",
        order.billing.first_name,
        order.billing.last_name,
        order.shipping.first_name,
        order.shipping.last_name,
        item_names,
        order.number,
    );

    joined.to_lowercase().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::fakes::{FakeRemote, MemoryStore};
    use super::*;
    use crate::models::{Address, LineItem};
    use rust_decimal::Decimal;
    use woo_mirror_core::{OrderId, ProductId};

    fn sync_config() -> SyncConfig {
        SyncConfig {
            lookback_days: 30,
            deletion_threshold_days: 90,
            cron: "0 0 12 * * *".to_string(),
            scheduler_enabled: false,
            sync_on_boot: false,
        }
    }

    fn remote_order(id: i64, number: &str, product_ids: &[i64]) -> RemoteOrder {
        RemoteOrder {
            id: OrderId::new(id),
            number: number.to_string(),
            order_key: format!("wc_order_{id}"),
            status: "processing".to_string(),
            date_created: Some(Utc::now()),
            date_modified: None,
            total: "19.99".to_string(),
            customer_id: woo_mirror_core::CustomerId::new(7),
            customer_note: String::new(),
            billing: Address {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                ..Address::default()
            },
            shipping: Address::default(),
            line_items: product_ids
                .iter()
                .map(|&pid| LineItem {
                    name: format!("Product {pid}"),
                    product_id: ProductId::new(pid),
                    quantity: 1,
                    ..LineItem::default()
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_sync_upserts_orders_and_backfills_products() {
        let remote = FakeRemote::new()
            .with_page(vec![remote_order(1001, "1001", &[42]), remote_order(1002, "1002", &[42, 43])]);
        let store = MemoryStore::new();

        let service = SyncService::new(remote, store.clone(), &sync_config());
        let summary = service.sync_orders().await.expect("sync pass");

        assert_eq!(summary.orders_synced, 2);
        // Product 42 appears in both orders but is fetched once
        assert_eq!(summary.products_backfilled, 2);
        assert_eq!(summary.product_failures, 0);
        assert_eq!(store.order_count(), 2);
        assert_eq!(store.product_count(), 2);
    }

    #[tokio::test]
    async fn test_sync_terminates_on_empty_page() {
        let remote = FakeRemote::new()
            .with_page(vec![remote_order(1, "1", &[])])
            .with_page(vec![remote_order(2, "2", &[])]);
        let store = MemoryStore::new();

        let service = SyncService::new(remote, store.clone(), &sync_config());
        let summary = service.sync_orders().await.expect("sync pass");

        assert_eq!(summary.pages_fetched, 2);
        assert_eq!(summary.orders_synced, 2);
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let remote = FakeRemote::new().with_page(vec![remote_order(1001, "1001", &[42])]);
        let store = MemoryStore::new();

        let service = SyncService::new(remote, store.clone(), &sync_config());
        service.sync_orders().await.expect("first pass");
        let summary = service.sync_orders().await.expect("second pass");

        // Second pass re-upserts the order but never refetches the product
        assert_eq!(summary.orders_synced, 1);
        assert_eq!(summary.products_backfilled, 0);
        assert_eq!(store.order_count(), 1);
        assert_eq!(store.product_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_product_backfill_does_not_abort_order() {
        // Product 99 is not known to the fake remote, so its fetch 404s
        let remote = FakeRemote::new()
            .with_page(vec![remote_order(1001, "1001", &[99, 42])])
            .without_product(99);
        let store = MemoryStore::new();

        let service = SyncService::new(remote, store.clone(), &sync_config());
        let summary = service.sync_orders().await.expect("sync pass");

        assert_eq!(summary.orders_synced, 1);
        assert_eq!(summary.products_backfilled, 1);
        assert_eq!(summary.product_failures, 1);
        assert!(store.order_count() == 1);
        assert!(!store.has_product(99));
        assert!(store.has_product(42));
    }

    #[tokio::test]
    async fn test_order_commits_before_backfill_store_failure() {
        // A store failure during the backfill lookup aborts the pass, but the
        // owning order was already upserted.
        let remote = FakeRemote::new().with_page(vec![remote_order(1001, "1001", &[42])]);
        let store = MemoryStore::new();
        store.fail_product_lookups();

        let service = SyncService::new(remote, store.clone(), &sync_config());
        let result = service.sync_orders().await;

        assert!(result.is_err());
        assert_eq!(store.order_count(), 1);
        assert_eq!(store.product_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_product_id_is_not_backfilled() {
        // Line items with product_id 0 reference no catalog product
        let remote = FakeRemote::new().with_page(vec![remote_order(1001, "1001", &[0])]);
        let store = MemoryStore::new();

        let service = SyncService::new(remote, store.clone(), &sync_config());
        let summary = service.sync_orders().await.expect("sync pass");

        assert_eq!(summary.orders_synced, 1);
        assert_eq!(summary.products_backfilled, 0);
        assert_eq!(store.product_count(), 0);
    }

    #[test]
    fn test_normalize_order_derives_total_amount() {
        let order = normalize_order(remote_order(1001, "1001", &[]));
        assert_eq!(order.total_amount, Decimal::new(1999, 2));
    }

    #[test]
    fn test_normalize_order_unparseable_total_is_zero() {
        let mut remote = remote_order(1001, "1001", &[]);
        remote.total = "free".to_string();
        let order = normalize_order(remote);
        assert_eq!(order.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_search_text_reference_vector() {
        let mut remote = remote_order(1001, "1001", &[]);
        remote.shipping.first_name = "Jane".to_string();
        remote.shipping.last_name = "Doe".to_string();
        remote.line_items = vec![LineItem {
            name: "Widget".to_string(),
            product_id: ProductId::new(42),
            quantity: 1,
            ..LineItem::default()
        }];

        assert_eq!(search_text(&remote), "jane doe jane doe widget 1001");
    }

    #[test]
    fn test_search_text_lowercases() {
        let mut remote = remote_order(1001, "1001", &[42]);
        remote.shipping.first_name = "JANE".to_string();
        remote.shipping.last_name = "DOE".to_string();

        let text = search_text(&remote);
        assert_eq!(text, "jane doe jane doe product 42 1001");
    }

    #[test]
    fn test_search_text_preserves_gaps_from_blank_fields() {
        // Shipping names absent: their slots stay as empty strings, so the
        // derived text keeps the gap instead of closing it up.
        let mut remote = remote_order(1001, "1001", &[]);
        remote.line_items = vec![LineItem {
            name: "Widget".to_string(),
            product_id: ProductId::new(42),
            quantity: 1,
            ..LineItem::default()
        }];

        assert_eq!(search_text(&remote), "jane doe   widget 1001");
    }

    #[test]
    fn test_search_text_empty_order() {
        let remote = RemoteOrder {
            id: OrderId::new(1),
            number: String::new(),
            order_key: String::new(),
            status: String::new(),
            date_created: None,
            date_modified: None,
            total: String::new(),
            customer_id: woo_mirror_core::CustomerId::new(0),
            customer_note: String::new(),
            billing: Address::default(),
            shipping: Address::default(),
            line_items: Vec::new(),
        };
        assert_eq!(search_text(&remote), "");
    }
}
