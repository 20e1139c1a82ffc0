use thiserror::Error;

pub mod codec;
pub mod database;
pub mod ingest;
pub mod query;
pub mod registry;

pub use codec::CodecError;
pub use database::DatabaseError;
pub use ingest::IngestError;
pub use query::QueryError;
pub use registry::RegistryError;

/// Internal error type for store and recorder operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors
/// (concern-specific). Callers that must never fail on audit problems go
/// through the submit_* surface, which logs and swallows this type.
#[derive(Error, Debug)]
pub enum RecorderError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl RecorderError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> RecorderError {
        RecorderError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }
}
