//! WooCommerce order/product mirror.
//!
//! Keeps a local `PostgreSQL` copy of a WooCommerce store's recent orders
//! and the products they reference, and serves it over a small read-only
//! JSON API.
//!
//! # Architecture
//!
//! - Axum web framework for the read API
//! - `sqlx`/`PostgreSQL` for the mirrored data
//! - WooCommerce REST API (`/wp-json/wc/v3`) as the upstream source
//! - `tokio-cron-scheduler` for the daily sync/cleanup job
//! - Sentry + tracing for error tracking and structured logs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod scheduler;
pub mod services;
pub mod state;
pub mod woocommerce;
