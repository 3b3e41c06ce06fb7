//! Woo Mirror Core - Shared types library.
//!
//! This crate provides common types used across all Woo Mirror components:
//! - `server` - The mirror service (sync engines + read API)
//! - `cli` - Command-line tools for migrations and one-off sync runs
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and monetary parsing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
