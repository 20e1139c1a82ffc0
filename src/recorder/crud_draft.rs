use std::sync::Arc;

use serde::Serialize;

use crate::codec::{self, FieldMap};
use crate::errors::internal::{IngestError, RecorderError};
use crate::stores::{ContentTypeStore, EventStore};
use crate::types::internal::event::{CrudEventKind, EventId, NewCrudEvent};
use crate::types::internal::key::ObjectId;

/// Captured entity state on one side of an event
///
/// Unserializable states degrade to a placeholder snapshot instead of
/// failing the event; partial audit data outweighs no audit data.
enum StateSlot {
    Unset,
    Fields(FieldMap),
    Unserializable,
}

impl StateSlot {
    fn is_set(&self) -> bool {
        !matches!(self, StateSlot::Unset)
    }

    fn into_fields(self) -> Option<FieldMap> {
        match self {
            StateSlot::Fields(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Fluent draft of a single CRUD event
///
/// # Example
/// ```ignore
/// let event_id = recorder
///     .crud_event("inventory_item", 42, CrudEventKind::Update)
///     .actor(7)
///     .old_state(&before)
///     .new_state(&after)
///     .record()
///     .await?;
/// ```
pub struct CrudEventDraft {
    events: Arc<EventStore>,
    content_types: Arc<ContentTypeStore>,
    entity_type: String,
    object_id: ObjectId,
    kind: CrudEventKind,
    actor: Option<i64>,
    old_state: StateSlot,
    new_state: StateSlot,
}

impl CrudEventDraft {
    pub(crate) fn new(
        events: Arc<EventStore>,
        content_types: Arc<ContentTypeStore>,
        entity_type: String,
        object_id: ObjectId,
        kind: CrudEventKind,
    ) -> Self {
        Self {
            events,
            content_types,
            entity_type,
            object_id,
            kind,
            actor: None,
            old_state: StateSlot::Unset,
            new_state: StateSlot::Unset,
        }
    }

    /// Set the acting user
    ///
    /// The string form persisted alongside is derived from this value at
    /// ingestion, never accepted from callers. Leaving the actor unset
    /// records an anonymous event.
    pub fn actor(mut self, user_pk: i64) -> Self {
        self.actor = Some(user_pk);
        self
    }

    /// Capture the entity state before the mutation
    pub fn old_state(mut self, state: &impl Serialize) -> Self {
        self.old_state = capture(&self.entity_type, "old", state);
        self
    }

    /// Capture the entity state after the mutation
    pub fn new_state(mut self, state: &impl Serialize) -> Self {
        self.new_state = capture(&self.entity_type, "new", state);
        self
    }

    /// Validate the draft and write it durably
    ///
    /// Fails with `UnknownEntityType` when the type was never registered
    /// and `KeyVariantMismatch` when the object id's variant disagrees with
    /// the registration. The change diff for update and relation events is
    /// computed here; create and delete rows never carry one.
    pub async fn record(self) -> Result<EventId, RecorderError> {
        let CrudEventDraft {
            events,
            content_types,
            entity_type,
            object_id,
            kind,
            actor,
            old_state,
            new_state,
        } = self;

        let registered = content_types.lookup(&entity_type).await?;
        if object_id.variant() != registered.variant {
            return Err(IngestError::KeyVariantMismatch {
                entity_type,
                registered: registered.variant,
                submitted: object_id.variant(),
            }
            .into());
        }

        // Delete events snapshot the state that just disappeared; everything
        // else snapshots the resulting state, falling back to the other side
        // when only one was captured.
        let snapshot = {
            let (primary, fallback) = if kind.is_delete() {
                (&old_state, &new_state)
            } else {
                (&new_state, &old_state)
            };
            let source = if primary.is_set() { primary } else { fallback };
            match source {
                StateSlot::Fields(fields) => Some(codec::snapshot(fields)),
                StateSlot::Unserializable => Some(codec::placeholder_snapshot()),
                StateSlot::Unset => None,
            }
        };
        let (object_repr, object_json_repr) = match snapshot {
            Some(s) => (Some(s.object_repr), Some(s.object_json_repr)),
            None => (None, None),
        };

        let changed_fields = if kind.is_update() || kind.is_m2m_change() {
            let old = old_state.into_fields().unwrap_or_default();
            let new = new_state.into_fields().unwrap_or_default();
            Some(codec::encode_changed_fields(&codec::diff(&old, &new))?)
        } else {
            None
        };

        let event = NewCrudEvent {
            kind,
            content_type_id: registered.id,
            object_id,
            object_repr,
            object_json_repr,
            changed_fields,
            user_id: actor,
            user_pk_as_string: actor.map(|pk| pk.to_string()),
        };

        events.append_crud(event).await
    }

    /// Record the event, swallowing failures
    ///
    /// Failures are logged and reported as `None` so the triggering
    /// business operation never sees a recorder error.
    pub async fn submit(self) -> Option<EventId> {
        let entity_type = self.entity_type.clone();
        let kind = self.kind;

        match self.record().await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!(
                    "Failed to record {} event for '{}': {}",
                    kind,
                    entity_type,
                    e
                );
                None
            }
        }
    }
}

fn capture(entity_type: &str, side: &str, state: &impl Serialize) -> StateSlot {
    match codec::field_map(state) {
        Ok(fields) => StateSlot::Fields(fields),
        Err(e) => {
            tracing::warn!(
                "Could not capture {} state of '{}': {}; recording placeholder",
                side,
                entity_type,
                e
            );
            StateSlot::Unserializable
        }
    }
}
