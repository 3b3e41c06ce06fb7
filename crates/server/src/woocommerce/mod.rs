//! WooCommerce REST API client.
//!
//! Thin typed wrapper over `/wp-json/wc/v3` using HTTP basic auth with the
//! store's consumer key/secret. Only the two read endpoints the mirror needs
//! are exposed: windowed order listings and single-product fetches.

pub mod types;

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use woo_mirror_core::ProductId;

use crate::config::WooConfig;
use crate::models::Product;

pub use types::RemoteOrder;

/// Page size for order listings. WooCommerce caps `per_page` at 100.
pub const PAGE_SIZE: u32 = 100;

/// Creation-date bounds for an order listing.
///
/// The sync engine lists forward from a lookback cutoff (`after`); the
/// cleanup engine lists everything older than the retention horizon
/// (`before`). Both bounds are exclusive on the remote side.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderWindow {
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}

impl OrderWindow {
    /// Window over orders created after `cutoff`.
    #[must_use]
    pub const fn created_after(cutoff: DateTime<Utc>) -> Self {
        Self {
            after: Some(cutoff),
            before: None,
        }
    }

    /// Window over orders created before `cutoff`.
    #[must_use]
    pub const fn created_before(cutoff: DateTime<Utc>) -> Self {
        Self {
            after: None,
            before: Some(cutoff),
        }
    }
}

/// Errors from the WooCommerce REST API client.
#[derive(Debug, Error)]
pub enum WooError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the store.
    #[error("Rate limited")]
    RateLimited,

    /// Non-success status from the store.
    #[error("Unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// WooCommerce REST API client.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct WooClient {
    inner: Arc<WooClientInner>,
}

struct WooClientInner {
    client: reqwest::Client,
    store_url: String,
    consumer_key: String,
    consumer_secret: String,
}

impl WooClient {
    /// Create a new WooCommerce client.
    #[must_use]
    pub fn new(config: &WooConfig) -> Self {
        let client = reqwest::Client::new();

        Self {
            inner: Arc::new(WooClientInner {
                client,
                store_url: config.store_url.clone(),
                consumer_key: config.consumer_key.clone(),
                consumer_secret: config.consumer_secret.expose_secret().to_string(),
            }),
        }
    }

    /// Get the store base URL.
    #[must_use]
    pub fn store_url(&self) -> &str {
        &self.inner.store_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/wp-json/wc/v3/{path}", self.inner.store_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, WooError> {
        let response = self
            .inner
            .client
            .get(self.endpoint(path))
            .query(query)
            .basic_auth(
                &self.inner.consumer_key,
                Some(&self.inner.consumer_secret),
            )
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(WooError::NotFound(path.to_string()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WooError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WooError::Status { status, body });
        }

        Ok(response.json().await?)
    }

    /// List one page of orders created inside `window`, oldest first.
    ///
    /// `page` is 1-indexed. An empty page means the listing is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `WooError` if the request fails or the store answers with a
    /// non-success status.
    #[instrument(skip(self, window), fields(page = page))]
    pub async fn list_orders(
        &self,
        page: u32,
        window: OrderWindow,
    ) -> Result<Vec<RemoteOrder>, WooError> {
        let mut query = vec![
            ("page", page.to_string()),
            ("per_page", PAGE_SIZE.to_string()),
            ("orderby", "date".to_string()),
            ("order", "asc".to_string()),
        ];
        if let Some(after) = window.after {
            query.push(("after", after.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(before) = window.before {
            query.push(("before", before.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }

        self.get_json("orders", &query).await
    }

    /// Fetch a single product snapshot by remote id.
    ///
    /// # Errors
    ///
    /// Returns `WooError::NotFound` if the product no longer exists upstream,
    /// or another `WooError` variant for transport and status failures.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, WooError> {
        self.get_json(&format!("products/{id}"), &[]).await
    }
}
