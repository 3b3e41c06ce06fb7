//! Retention cleanup engine.
//!
//! Walks the remote order listing older than the retention horizon, deletes
//! each order still mirrored locally, and removes any product snapshot the
//! deleted order referenced that no surviving order still needs. Products
//! only ever leave the mirror through this path.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use tracing::instrument;

use crate::services::sync::SyncService;
use crate::woocommerce::OrderWindow;

use super::{MirrorStore, RemoteSource, SyncError};

/// Outcome of one cleanup pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupSummary {
    /// Stale orders removed from the mirror.
    pub orders_deleted: u64,
    /// Orphaned product snapshots removed.
    pub products_deleted: u64,
    /// Remote pages consumed.
    pub pages_fetched: u64,
}

impl<R: RemoteSource, S: MirrorStore> SyncService<R, S> {
    /// Run one retention cleanup pass.
    ///
    /// Pages through remote orders created before the deletion threshold,
    /// oldest first, until an empty page. A remote order with no local
    /// counterpart is skipped silently (already cleaned, or never synced).
    /// A mirrored order is deleted first, then each product its line items
    /// referenced is deleted iff no remaining mirrored order references it;
    /// the ordering guarantees the order being removed never counts as a
    /// reference.
    ///
    /// Unlike sync, there is no per-item failure isolation: any listing or
    /// store failure aborts the remainder of the pass.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` if a page cannot be listed or the mirror cannot
    /// be read or written.
    #[instrument(skip(self))]
    pub async fn cleanup_old_orders(&self) -> Result<CleanupSummary, SyncError> {
        let window =
            OrderWindow::created_before(Utc::now() - Duration::days(self.deletion_threshold_days()));
        let mut summary = CleanupSummary::default();
        let mut page = 1;

        loop {
            let stale = self.remote().list_orders(page, window).await?;
            if stale.is_empty() {
                break;
            }
            summary.pages_fetched += 1;

            for remote_order in stale {
                let Some(order) = self.store().find_order(remote_order.id).await? else {
                    continue;
                };

                let candidates: BTreeSet<_> = order
                    .line_items
                    .iter()
                    .filter(|item| item.references_product())
                    .map(|item| item.product_id)
                    .collect();

                if self.store().delete_order(order.id).await? {
                    summary.orders_deleted += 1;
                }

                for product_id in candidates {
                    if self.store().count_orders_referencing(product_id).await? > 0 {
                        continue;
                    }
                    if self.store().delete_product(product_id).await? {
                        summary.products_deleted += 1;
                    }
                }
            }

            page += 1;
        }

        tracing::info!(
            orders_deleted = summary.orders_deleted,
            products_deleted = summary.products_deleted,
            pages_fetched = summary.pages_fetched,
            "Retention cleanup pass complete"
        );

        Ok(summary)
    }
}
