pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_content_types;
mod m20250601_000002_create_crud_event_tables;
mod m20250601_000003_create_login_events;
mod m20250601_000004_create_request_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_content_types::Migration),
            Box::new(m20250601_000002_create_crud_event_tables::Migration),
            Box::new(m20250601_000003_create_login_events::Migration),
            Box::new(m20250601_000004_create_request_events::Migration),
        ]
    }
}
