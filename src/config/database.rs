use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::settings::RecorderSettings;
use crate::errors::internal::RecorderError;

/// Connect to the audit database
///
/// Connects and returns the connection. Does NOT run migrations - call
/// migrate() separately.
pub async fn connect(settings: &RecorderSettings) -> Result<DatabaseConnection, RecorderError> {
    let database_url = settings.database_url();

    let db = Database::connect(database_url)
        .await
        .map_err(|e| RecorderError::database("connect_database", e))?;

    tracing::debug!("Connected to audit database: {}", database_url);

    Ok(db)
}

/// Run all pending migrations on the audit database
pub async fn migrate(db: &DatabaseConnection) -> Result<(), RecorderError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| RecorderError::database("run_migrations", e))?;

    tracing::debug!("Audit database migrations completed");

    Ok(())
}
