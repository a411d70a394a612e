/// Database migration runner
///
/// Migrations live in the workspace-level `migrations/` directory and are
/// embedded into the binary at compile time by `sqlx::migrate!`.

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Runs all pending migrations
///
/// Each migration runs in its own transaction; a failure stops the run and
/// leaves earlier migrations applied.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("../migrations").run(pool).await {
        Ok(()) => {
            info!("Database migrations complete");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the database if it doesn't exist
///
/// Used in development so a fresh PostgreSQL server works without manual
/// setup.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Database already exists");
        return Ok(());
    }

    info!("Database does not exist, creating it");
    Postgres::create_database(database_url).await?;
    Ok(())
}
