//! Integration tests for the WooCommerce mirror.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p woo-mirror-cli -- migrate
//!
//! # Start the server
//! cargo run -p woo-mirror-server
//!
//! # Run integration tests
//! cargo test -p woo-mirror-integration-tests -- --ignored
//! ```
//!
//! The tests in `tests/` hit a running server over HTTP and are `#[ignore]`d
//! by default so `cargo test` stays hermetic.

/// Base URL for the mirror read API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("MIRROR_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
