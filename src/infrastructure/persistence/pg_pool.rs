use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, instrument, warn};

use crate::application::ports::RepositoryError;
use crate::presentation::config::DatabaseSettings;

const FIRST_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Connects, retrying with exponential backoff up to `connect_attempts` times.
#[instrument(skip_all, fields(max_connections = settings.max_connections))]
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, RepositoryError> {
    let options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs));
    let attempts = settings.connect_attempts.max(1);
    let mut backoff = FIRST_BACKOFF;

    for attempt in 1..=attempts {
        match options.clone().connect(&settings.url).await {
            Ok(pool) => {
                info!(attempt, "PostgreSQL pool ready");
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                warn!(
                    error = %e,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "PostgreSQL unreachable, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
            Err(e) => return Err(RepositoryError::ConnectionFailed(e.to_string())),
        }
    }
    Err(RepositoryError::ConnectionFailed("no connection attempt made".to_string()))
}

/// Applies the bundled `jobs`/`job_items` migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(format!("migration failed: {e}")))?;
    info!("Job tables migrated");
    Ok(())
}
