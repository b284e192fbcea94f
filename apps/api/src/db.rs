use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

/// Connects to the capture database, best-effort.
///
/// The capture sink is never on the critical path, so a connection failure
/// degrades to a disabled sink instead of aborting startup.
pub async fn try_create_pool(database_url: &str) -> Option<PgPool> {
    info!("Connecting to capture database...");

    match PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
    {
        Ok(pool) => {
            info!("Capture database connection pool established");
            Some(pool)
        }
        Err(e) => {
            warn!("Capture database unavailable, captures will not be persisted: {e}");
            None
        }
    }
}
