//! One-off sync and cleanup passes.
//!
//! These run the same engines as the scheduled job, but once, and propagate
//! failures to the process exit code so they compose with external cron or
//! operator runbooks.

use woo_mirror_server::config::MirrorConfig;
use woo_mirror_server::db;
use woo_mirror_server::services::SyncService;
use woo_mirror_server::woocommerce::WooClient;

async fn service() -> Result<SyncService<WooClient, sqlx::PgPool>, Box<dyn std::error::Error>> {
    let config = MirrorConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    let woo = WooClient::new(&config.woocommerce);
    Ok(SyncService::new(woo, pool, &config.sync))
}

/// Run one incremental order sync pass.
///
/// # Errors
///
/// Returns an error if configuration is missing or the pass fails.
pub async fn sync() -> Result<(), Box<dyn std::error::Error>> {
    let summary = service().await?.sync_orders().await?;
    tracing::info!(?summary, "Sync pass complete");
    Ok(())
}

/// Run one retention cleanup pass.
///
/// # Errors
///
/// Returns an error if configuration is missing or the pass fails.
pub async fn cleanup() -> Result<(), Box<dyn std::error::Error>> {
    let summary = service().await?.cleanup_old_orders().await?;
    tracing::info!(?summary, "Cleanup pass complete");
    Ok(())
}
