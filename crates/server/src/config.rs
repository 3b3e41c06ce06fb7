//! Mirror configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `WOOCOMMERCE_STORE_URL` - Base URL of the WooCommerce store (e.g., <https://shop.example.com>)
//! - `WOOCOMMERCE_CONSUMER_KEY` - WooCommerce REST API consumer key
//! - `WOOCOMMERCE_CONSUMER_SECRET` - WooCommerce REST API consumer secret
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `ORDER_LOOKBACK_DAYS` - Incremental sync window in days (default: 30)
//! - `ORDER_DELETION_THRESHOLD_DAYS` - Retention horizon in days (default: 90)
//! - `SYNC_CRON` - Cron expression for the scheduled sync (default: `0 0 12 * * *`)
//! - `SCHEDULER_ENABLED` - Set to `false` to disable the in-process scheduler
//! - `SYNC_ON_BOOT` - Set to `true` to run a sync pass at startup
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_SYNC_CRON: &str = "0 0 12 * * *";
const DEFAULT_LOOKBACK_DAYS: i64 = 30;
const DEFAULT_DELETION_THRESHOLD_DAYS: i64 = 90;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Mirror application configuration.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// WooCommerce REST API configuration
    pub woocommerce: WooConfig,
    /// Incremental sync and retention settings
    pub sync: SyncConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// WooCommerce REST API configuration.
///
/// Implements `Debug` manually to redact the API credentials.
#[derive(Clone)]
pub struct WooConfig {
    /// Base URL of the store (e.g., <https://shop.example.com>)
    pub store_url: String,
    /// REST API consumer key (ck_...)
    pub consumer_key: String,
    /// REST API consumer secret (cs_...)
    pub consumer_secret: SecretString,
}

impl std::fmt::Debug for WooConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooConfig")
            .field("store_url", &self.store_url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}

impl WooConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let store_url = get_required_env("WOOCOMMERCE_STORE_URL")?
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            store_url,
            consumer_key: get_required_env("WOOCOMMERCE_CONSUMER_KEY")?,
            consumer_secret: SecretString::from(get_required_env("WOOCOMMERCE_CONSUMER_SECRET")?),
        })
    }
}

/// Incremental sync and retention settings.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How far back the incremental sync window reaches, in days
    pub lookback_days: i64,
    /// Age past which mirrored orders are deleted, in days
    pub deletion_threshold_days: i64,
    /// Cron expression for the scheduled sync pass (six-field, with seconds)
    pub cron: String,
    /// Whether the in-process scheduler runs at all
    pub scheduler_enabled: bool,
    /// Whether a sync pass runs once at startup
    pub sync_on_boot: bool,
}

impl SyncConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let lookback_days = get_parsed_or_default("ORDER_LOOKBACK_DAYS", DEFAULT_LOOKBACK_DAYS)?;
        let deletion_threshold_days = get_parsed_or_default(
            "ORDER_DELETION_THRESHOLD_DAYS",
            DEFAULT_DELETION_THRESHOLD_DAYS,
        )?;

        if lookback_days <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ORDER_LOOKBACK_DAYS".to_string(),
                "must be positive".to_string(),
            ));
        }
        if deletion_threshold_days <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ORDER_DELETION_THRESHOLD_DAYS".to_string(),
                "must be positive".to_string(),
            ));
        }

        Ok(Self {
            lookback_days,
            deletion_threshold_days,
            cron: get_env_or_default("SYNC_CRON", DEFAULT_SYNC_CRON),
            scheduler_enabled: get_bool_or_default("SCHEDULER_ENABLED", true)?,
            sync_on_boot: get_bool_or_default("SYNC_ON_BOOT", false)?,
        })
    }
}

impl MirrorConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = SecretString::from(get_required_env("DATABASE_URL")?);
        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let woocommerce = WooConfig::from_env()?;
        let sync = SyncConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            woocommerce,
            sync,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed to `T`, or a default when unset.
fn get_parsed_or_default<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Get a boolean environment variable (`true`/`false`, `1`/`0`), or a default.
fn get_bool_or_default(key: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected boolean, got '{other}'"),
            )),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> MirrorConfig {
        MirrorConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            woocommerce: WooConfig {
                store_url: "https://shop.example.com".to_string(),
                consumer_key: "ck_test".to_string(),
                consumer_secret: SecretString::from("cs_test_secret"),
            },
            sync: SyncConfig {
                lookback_days: DEFAULT_LOOKBACK_DAYS,
                deletion_threshold_days: DEFAULT_DELETION_THRESHOLD_DAYS,
                cron: DEFAULT_SYNC_CRON.to_string(),
                scheduler_enabled: true,
                sync_on_boot: false,
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_woo_config_debug_redacts_secret() {
        let config = test_config();
        let debug_output = format!("{:?}", config.woocommerce);

        assert!(debug_output.contains("https://shop.example.com"));
        assert!(debug_output.contains("ck_test"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("cs_test_secret"));
    }

    #[test]
    fn test_default_cron_is_six_field() {
        assert_eq!(DEFAULT_SYNC_CRON.split_whitespace().count(), 6);
    }
}
