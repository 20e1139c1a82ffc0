use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, NotSet, Set};

use crate::errors::internal::RecorderError;
use crate::types::db::{
    crud_event, crud_event_big_integer, crud_event_uuid, login_event, request_event,
};
use crate::types::internal::event::{EventId, NewCrudEvent, NewLoginEvent, NewRequestEvent};
use crate::types::internal::key::{KeyVariant, ObjectId};

/// Append-only repository for event rows
///
/// There is no update or delete surface here on purpose; administrative
/// mutations live in CleanupStore.
pub struct EventStore {
    db: DatabaseConnection,
}

impl EventStore {
    /// Create a new EventStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one CRUD event to the variant table matching its object id
    ///
    /// datetime is assigned here, at the durable write. Each append is a
    /// single atomic insert; concurrent appends need no coordination.
    ///
    /// # Errors
    ///
    /// Returns `RecorderError` if the database insert fails
    pub async fn append_crud(&self, event: NewCrudEvent) -> Result<EventId, RecorderError> {
        let now = Utc::now();

        match event.object_id {
            ObjectId::Integer(object_id) => {
                let row = crud_event::ActiveModel {
                    id: NotSet,
                    event_type: Set(event.kind.code()),
                    content_type_id: Set(event.content_type_id),
                    object_id: Set(object_id),
                    object_repr: Set(event.object_repr),
                    object_json_repr: Set(event.object_json_repr),
                    changed_fields: Set(event.changed_fields),
                    user_id: Set(event.user_id),
                    user_pk_as_string: Set(event.user_pk_as_string),
                    datetime: Set(now),
                };

                let inserted = row
                    .insert(&self.db)
                    .await
                    .map_err(|e| RecorderError::database("append_crud_event", e))?;

                Ok(EventId::Crud(KeyVariant::Integer, inserted.id))
            }
            ObjectId::BigInteger(object_id) => {
                let row = crud_event_big_integer::ActiveModel {
                    id: NotSet,
                    event_type: Set(event.kind.code()),
                    content_type_id: Set(event.content_type_id),
                    object_id: Set(object_id),
                    object_repr: Set(event.object_repr),
                    object_json_repr: Set(event.object_json_repr),
                    changed_fields: Set(event.changed_fields),
                    user_id: Set(event.user_id),
                    user_pk_as_string: Set(event.user_pk_as_string),
                    datetime: Set(now),
                };

                let inserted = row
                    .insert(&self.db)
                    .await
                    .map_err(|e| RecorderError::database("append_crud_event_big_integer", e))?;

                Ok(EventId::Crud(KeyVariant::BigInteger, inserted.id))
            }
            ObjectId::Uuid(object_id) => {
                let row = crud_event_uuid::ActiveModel {
                    id: NotSet,
                    event_type: Set(event.kind.code()),
                    content_type_id: Set(event.content_type_id),
                    object_id: Set(object_id),
                    object_repr: Set(event.object_repr),
                    object_json_repr: Set(event.object_json_repr),
                    changed_fields: Set(event.changed_fields),
                    user_id: Set(event.user_id),
                    user_pk_as_string: Set(event.user_pk_as_string),
                    datetime: Set(now),
                };

                let inserted = row
                    .insert(&self.db)
                    .await
                    .map_err(|e| RecorderError::database("append_crud_event_uuid", e))?;

                Ok(EventId::Crud(KeyVariant::Uuid, inserted.id))
            }
        }
    }

    /// Append one login event
    pub async fn append_login(&self, event: NewLoginEvent) -> Result<EventId, RecorderError> {
        let row = login_event::ActiveModel {
            id: NotSet,
            login_type: Set(event.kind.code()),
            username: Set(event.username),
            user_id: Set(event.user_id),
            remote_ip: Set(event.remote_ip),
            datetime: Set(Utc::now()),
        };

        let inserted = row
            .insert(&self.db)
            .await
            .map_err(|e| RecorderError::database("append_login_event", e))?;

        Ok(EventId::Login(inserted.id))
    }

    /// Append one request event
    pub async fn append_request(&self, event: NewRequestEvent) -> Result<EventId, RecorderError> {
        let row = request_event::ActiveModel {
            id: NotSet,
            url: Set(event.url),
            method: Set(event.method),
            query_string: Set(event.query_string),
            user_id: Set(event.user_id),
            remote_ip: Set(event.remote_ip),
            datetime: Set(Utc::now()),
        };

        let inserted = row
            .insert(&self.db)
            .await
            .map_err(|e| RecorderError::database("append_request_event", e))?;

        Ok(EventId::Request(inserted.id))
    }
}
