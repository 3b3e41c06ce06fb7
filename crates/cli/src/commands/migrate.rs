//! Database migration command.
//!
//! Reads `DATABASE_URL` (dotenv-aware) and applies the migrations embedded
//! from `crates/server/migrations/`.

use woo_mirror_server::config::MirrorConfig;
use woo_mirror_server::db;

/// Run pending database migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = MirrorConfig::from_env()?;

    tracing::info!("Connecting to mirror database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
