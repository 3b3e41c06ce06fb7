//! Mirrored product records.

use serde::{Deserialize, Serialize};
use woo_mirror_core::ProductId;

use super::woo_datetime;
use chrono::{DateTime, Utc};

/// A category or tag reference on a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRef {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// A product image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

/// A mirrored product.
///
/// Inserted once, as the full snapshot the remote returned the first time a
/// synced order referenced it; never refreshed afterwards. Deleted by the
/// cleanup engine only when no remaining local order references it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default, with = "woo_datetime")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, with = "woo_datetime")]
    pub date_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub regular_price: String,
    #[serde(default)]
    pub sale_price: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub stock_status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub categories: Vec<TermRef>,
    #[serde(default)]
    pub tags: Vec<TermRef>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}
