use serde::Serialize;

use crate::errors::internal::RecorderError;
use crate::stores::RegisteredType;
use crate::types::internal::event::{CrudEventKind, EventId};
use crate::types::internal::key::{ObjectId, PrimaryKeyKind};

use super::EventRecorder;

/// Typed seam for collaborator entities under audit
///
/// Implementing this replaces stringly-typed registration and drafting with
/// calls keyed by the entity type itself. The recorder still validates the
/// registration at record time, so a `Tracked` impl whose `KEY_KIND` was
/// never registered fails the same way an unknown tag does.
pub trait Tracked: Serialize {
    /// Stable entity-type name persisted in the registry
    const ENTITY_TYPE: &'static str;

    /// Declared primary-key kind, resolved to a storage variant once at
    /// registration
    const KEY_KIND: PrimaryKeyKind;

    /// Primary-key value of this row
    fn object_id(&self) -> ObjectId;
}

impl EventRecorder {
    /// Register a `Tracked` entity type
    pub async fn register_tracked<T: Tracked>(&self) -> Result<RegisteredType, RecorderError> {
        self.content_types.register(T::ENTITY_TYPE, T::KEY_KIND).await
    }

    /// Record the creation of a tracked row
    pub async fn record_created<T: Tracked>(
        &self,
        entity: &T,
        actor: Option<i64>,
    ) -> Result<EventId, RecorderError> {
        let mut draft = self
            .crud_event(T::ENTITY_TYPE, entity.object_id(), CrudEventKind::Create)
            .new_state(entity);
        if let Some(actor) = actor {
            draft = draft.actor(actor);
        }
        draft.record().await
    }

    /// Record an update of a tracked row, diffing old against new
    pub async fn record_updated<T: Tracked>(
        &self,
        old: &T,
        new: &T,
        actor: Option<i64>,
    ) -> Result<EventId, RecorderError> {
        let mut draft = self
            .crud_event(T::ENTITY_TYPE, new.object_id(), CrudEventKind::Update)
            .old_state(old)
            .new_state(new);
        if let Some(actor) = actor {
            draft = draft.actor(actor);
        }
        draft.record().await
    }

    /// Record the deletion of a tracked row, snapshotting its last state
    pub async fn record_deleted<T: Tracked>(
        &self,
        entity: &T,
        actor: Option<i64>,
    ) -> Result<EventId, RecorderError> {
        let mut draft = self
            .crud_event(T::ENTITY_TYPE, entity.object_id(), CrudEventKind::Delete)
            .old_state(entity);
        if let Some(actor) = actor {
            draft = draft.actor(actor);
        }
        draft.record().await
    }

    /// Record a creation, swallowing failures
    pub async fn submit_created<T: Tracked>(&self, entity: &T, actor: Option<i64>) -> Option<EventId> {
        match self.record_created(entity, actor).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!(
                    "Failed to record create event for '{}': {}",
                    T::ENTITY_TYPE,
                    e
                );
                None
            }
        }
    }

    /// Record an update, swallowing failures
    pub async fn submit_updated<T: Tracked>(
        &self,
        old: &T,
        new: &T,
        actor: Option<i64>,
    ) -> Option<EventId> {
        match self.record_updated(old, new, actor).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!(
                    "Failed to record update event for '{}': {}",
                    T::ENTITY_TYPE,
                    e
                );
                None
            }
        }
    }

    /// Record a deletion, swallowing failures
    pub async fn submit_deleted<T: Tracked>(&self, entity: &T, actor: Option<i64>) -> Option<EventId> {
        match self.record_deleted(entity, actor).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!(
                    "Failed to record delete event for '{}': {}",
                    T::ENTITY_TYPE,
                    e
                );
                None
            }
        }
    }
}
