//! Mirrored domain records.
//!
//! These are the shapes the mirror persists and the read API serves. Orders
//! carry two derived fields on top of the remote payload (`total_amount`,
//! `search_text`); products are stored as the snapshot the remote returned.

pub mod order;
pub mod product;

pub use order::{Address, LineItem, MetaData, Order, TaxLine};
pub use product::{Product, ProductImage, TermRef};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parse a WooCommerce datetime string.
///
/// WooCommerce emits `date_created` in site-local time without a UTC offset
/// (`2026-08-30T12:34:56`); some deployments are configured to emit RFC 3339.
/// Offset-less values are treated as UTC.
pub fn parse_woo_datetime(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

/// Serde adapter for optional WooCommerce datetimes.
///
/// Use with `#[serde(with = "models::woo_datetime")]`. Serializes as
/// RFC 3339 so mirrored records round-trip cleanly through the read API.
pub mod woo_datetime {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => super::parse_woo_datetime(s).map(Some).map_err(D::Error::custom),
        }
    }
}
