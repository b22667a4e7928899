/// Embedded schema migrations
///
/// SQL files in the workspace `migrations/` directory are compiled into the
/// binary with `sqlx::migrate!` and applied at startup.

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{error, info};

/// Applies every pending migration
///
/// # Errors
///
/// Fails when a migration does not apply cleanly or a previously applied
/// migration file has changed.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    sqlx::migrate!("../migrations")
        .run(pool)
        .await
        .inspect_err(|e| error!(error = %e, "Migration failed"))?;

    info!("Database schema is up to date");
    Ok(())
}

/// Creates the database named in `database_url` when it is missing
///
/// Intended for local development; production databases are provisioned
/// ahead of time.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    }
    Ok(())
}
