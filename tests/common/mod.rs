// Common test utilities for integration tests

use audit_trail::AuditTrail;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

/// Creates a test audit database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates a fully wired trail over a fresh in-memory database
pub async fn setup_trail() -> AuditTrail {
    AuditTrail::from_connection(setup_test_db().await)
}
