//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::MirrorConfig;
use crate::woocommerce::WooClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MirrorConfig,
    pool: PgPool,
    woo: WooClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: MirrorConfig, pool: PgPool) -> Self {
        let woo = WooClient::new(&config.woocommerce);

        Self {
            inner: Arc::new(AppStateInner { config, pool, woo }),
        }
    }

    /// Get a reference to the mirror configuration.
    #[must_use]
    pub fn config(&self) -> &MirrorConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the WooCommerce REST API client.
    #[must_use]
    pub fn woo(&self) -> &WooClient {
        &self.inner.woo
    }
}
