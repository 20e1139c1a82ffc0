use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{database, RecorderSettings};
use crate::errors::internal::RecorderError;
use crate::recorder::EventRecorder;
use crate::stores::{CleanupStore, ContentTypeStore, EventQueryStore, EventStore};

/// Centralized recorder wiring following the main-owned stores pattern
///
/// All pieces are created once and shared via `Arc`; embedders clone the
/// handles they pass to collaborators.
///
/// # Architecture
///
/// ```text
/// AuditTrail::init(settings)
///   ↓ connect + migrate
///   ↓ creates once
///   ├─ db (DatabaseConnection)
///   ├─ content_types (Arc<ContentTypeStore>)
///   ├─ events (Arc<EventStore>)
///   ├─ queries (Arc<EventQueryStore>)
///   ├─ cleanup (Arc<CleanupStore>)
///   └─ recorder (Arc<EventRecorder>)
/// ```
pub struct AuditTrail {
    pub db: DatabaseConnection,
    pub content_types: Arc<ContentTypeStore>,
    pub events: Arc<EventStore>,
    pub queries: Arc<EventQueryStore>,
    pub cleanup: Arc<CleanupStore>,
    pub recorder: Arc<EventRecorder>,
}

impl AuditTrail {
    /// Connect to the audit database, migrate it, and build everything
    pub async fn init(settings: &RecorderSettings) -> Result<Self, RecorderError> {
        tracing::info!("Initializing audit trail...");

        let db = database::connect(settings).await?;
        database::migrate(&db).await?;

        Ok(Self::from_connection(db))
    }

    /// Build the trail over an existing, already migrated connection
    ///
    /// Tests and embedders that manage their own connection use this form.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        // Order matters: the registry first, everything else shares it
        let content_types = Arc::new(ContentTypeStore::new(db.clone()));
        let events = Arc::new(EventStore::new(db.clone()));
        let queries = Arc::new(EventQueryStore::new(db.clone(), content_types.clone()));
        let cleanup = Arc::new(CleanupStore::new(db.clone(), content_types.clone()));
        let recorder = Arc::new(EventRecorder::new(events.clone(), content_types.clone()));

        tracing::debug!("Audit trail stores created");

        Self {
            db,
            content_types,
            events,
            queries,
            cleanup,
            recorder,
        }
    }
}
