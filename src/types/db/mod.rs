// Database entities - SeaORM models, one file per table
//
// No DB-level foreign keys anywhere: user and content-type references are
// weak, cleaned up by explicit jobs in CleanupStore.
pub mod content_type;
pub mod crud_event;
pub mod crud_event_big_integer;
pub mod crud_event_uuid;
pub mod login_event;
pub mod request_event;
