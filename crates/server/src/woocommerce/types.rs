//! Wire types for the WooCommerce REST API.

use serde::Deserialize;
use woo_mirror_core::{CustomerId, OrderId};

use crate::models::{Address, LineItem, woo_datetime};
use chrono::{DateTime, Utc};

/// An order as the WooCommerce REST API transmits it.
///
/// This is the raw remote shape; the sync engine normalizes it into a
/// mirrored [`crate::models::Order`] by deriving `total_amount` and
/// `search_text`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteOrder {
    pub id: OrderId,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub order_key: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, with = "woo_datetime")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, with = "woo_datetime")]
    pub date_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total: String,
    #[serde(default)]
    pub customer_id: CustomerId,
    #[serde(default)]
    pub customer_note: String,
    #[serde(default)]
    pub billing: Address,
    #[serde(default)]
    pub shipping: Address,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}
