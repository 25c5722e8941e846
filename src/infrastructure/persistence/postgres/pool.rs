//! # Connection Pool
//!
//! Builds the shared `PgPool` and applies the embedded migrations.

use crate::infrastructure::config::DatabaseConfig;
use crate::infrastructure::persistence::traits::{RepositoryError, RepositoryResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

/// Opens a connection pool.
///
/// # Errors
///
/// Returns `RepositoryError::Connection` if the database is unreachable.
pub async fn create_pool(config: &DatabaseConfig) -> RepositoryResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await
        .map_err(|e| RepositoryError::connection(e.to_string()))?;

    info!(
        max_connections = config.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Applies pending migrations from `migrations/`.
///
/// # Errors
///
/// Returns `RepositoryError::Internal` if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> RepositoryResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| RepositoryError::internal(e.to_string()))?;
    info!("migrations applied");
    Ok(())
}
