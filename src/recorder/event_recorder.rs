use std::sync::Arc;

use crate::errors::internal::RecorderError;
use crate::recorder::crud_draft::CrudEventDraft;
use crate::stores::{ContentTypeStore, EventStore, RegisteredType};
use crate::types::internal::event::CrudEventKind;
use crate::types::internal::key::{ObjectId, PrimaryKeyKind};

/// Ingestion facade that validates events before anything reaches storage
///
/// Collaborators hold an `Arc<EventRecorder>` and call it synchronously with
/// the triggering operation. Recording failures never propagate into the
/// triggering operation when the `submit_*` forms are used.
pub struct EventRecorder {
    pub(crate) events: Arc<EventStore>,
    pub(crate) content_types: Arc<ContentTypeStore>,
}

impl EventRecorder {
    pub fn new(events: Arc<EventStore>, content_types: Arc<ContentTypeStore>) -> Self {
        Self {
            events,
            content_types,
        }
    }

    /// Register an entity type under a declared primary-key kind
    ///
    /// Must happen before any event for the type is recorded. Unsupported
    /// key kinds are rejected here, never at record time.
    ///
    /// # Arguments
    /// * `entity_type` - Stable name of the tracked entity type
    /// * `kind` - Declared primary-key kind of the entity
    pub async fn register(
        &self,
        entity_type: &str,
        kind: PrimaryKeyKind,
    ) -> Result<RegisteredType, RecorderError> {
        self.content_types.register(entity_type, kind).await
    }

    /// Start a CRUD event draft for one tracked row
    ///
    /// The draft is a fluent builder: set `actor`, `old_state` and
    /// `new_state` as applicable, then `record()` or `submit()`.
    ///
    /// # Arguments
    /// * `entity_type` - Registered name of the tracked entity type
    /// * `object_id` - Primary-key value of the affected row
    /// * `kind` - Which mutation happened
    pub fn crud_event(
        &self,
        entity_type: impl Into<String>,
        object_id: impl Into<ObjectId>,
        kind: CrudEventKind,
    ) -> CrudEventDraft {
        CrudEventDraft::new(
            self.events.clone(),
            self.content_types.clone(),
            entity_type.into(),
            object_id.into(),
            kind,
        )
    }
}
