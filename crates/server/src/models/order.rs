//! Mirrored order records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use woo_mirror_core::{CustomerId, OrderId, ProductId};

use super::woo_datetime;
use chrono::{DateTime, Utc};

/// A billing or shipping address as WooCommerce transmits it.
///
/// Every field is optional on the wire; absent fields normalize to empty
/// strings so the mirror never stores nulls for address text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// An arbitrary key/value metadata pair attached to line items or tax lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Per-line-item tax breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub rate_code: String,
    #[serde(default)]
    pub rate_id: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub compound: bool,
    #[serde(default)]
    pub tax_total: String,
    #[serde(default)]
    pub shipping_tax_total: String,
    #[serde(default)]
    pub meta_data: Vec<MetaData>,
}

/// A single order line item.
///
/// `product_id` is a soft foreign key into the products table. WooCommerce
/// uses id `0` for line items that no longer reference a catalog product
/// (deleted products, custom fees), so `0` means "no product".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub product_id: ProductId,
    #[serde(default)]
    pub variation_id: Option<i64>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub tax_class: Option<String>,
    #[serde(default)]
    pub subtotal: String,
    #[serde(default)]
    pub subtotal_tax: String,
    #[serde(default)]
    pub total: String,
    #[serde(default)]
    pub total_tax: String,
    #[serde(default)]
    pub taxes: Vec<TaxLine>,
    #[serde(default)]
    pub meta_data: Vec<MetaData>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl LineItem {
    /// Whether this line item references a catalog product.
    #[must_use]
    pub const fn references_product(&self) -> bool {
        self.product_id.as_i64() != 0
    }
}

/// A mirrored order.
///
/// Created/overwritten wholesale by the sync engine (upsert by remote id,
/// full replace) and deleted only by the retention cleanup engine.
///
/// Invariants, re-established on every upsert:
/// - `total_amount` is `parse_total(total)`
/// - `search_text` is derived from the current billing/shipping names,
///   line-item names and order number, never hand-edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
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
    pub total_amount: Decimal,
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
    #[serde(default)]
    pub search_text: String,
}
