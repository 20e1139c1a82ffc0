use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Value};

use crate::errors::internal::RecorderError;
use crate::stores::content_type_store::ContentTypeStore;
use crate::types::db::crud_event::{self, Entity as CrudEvent};
use crate::types::db::crud_event_big_integer::{self, Entity as CrudEventBigInteger};
use crate::types::db::crud_event_uuid::{self, Entity as CrudEventUuid};
use crate::types::db::content_type::Entity as ContentType;
use crate::types::db::login_event::{self, Entity as LoginEvent};
use crate::types::db::request_event::{self, Entity as RequestEvent};

/// Retention and privacy maintenance over the recorded trail
pub struct CleanupStore {
    db: DatabaseConnection,
    content_types: Arc<ContentTypeStore>,
}

impl CleanupStore {
    pub fn new(db: DatabaseConnection, content_types: Arc<ContentTypeStore>) -> Self {
        Self { db, content_types }
    }

    /// Null out the weak user reference on every event a user produced
    ///
    /// Only user_id is cleared. user_pk_as_string and username stay behind
    /// as the historical record of who acted, which is what makes the
    /// reference weak rather than a foreign key.
    pub async fn detach_user(&self, user_pk: i64) -> Result<u64, RecorderError> {
        let mut detached = 0;

        let result = CrudEvent::update_many()
            .col_expr(crud_event::Column::UserId, Expr::value(Value::BigInt(None)))
            .filter(crud_event::Column::UserId.eq(user_pk))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("detach_user_crud_events", e))?;
        detached += result.rows_affected;

        let result = CrudEventBigInteger::update_many()
            .col_expr(
                crud_event_big_integer::Column::UserId,
                Expr::value(Value::BigInt(None)),
            )
            .filter(crud_event_big_integer::Column::UserId.eq(user_pk))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("detach_user_crud_events_big_integer", e))?;
        detached += result.rows_affected;

        let result = CrudEventUuid::update_many()
            .col_expr(
                crud_event_uuid::Column::UserId,
                Expr::value(Value::BigInt(None)),
            )
            .filter(crud_event_uuid::Column::UserId.eq(user_pk))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("detach_user_crud_events_uuid", e))?;
        detached += result.rows_affected;

        let result = LoginEvent::update_many()
            .col_expr(
                login_event::Column::UserId,
                Expr::value(Value::BigInt(None)),
            )
            .filter(login_event::Column::UserId.eq(user_pk))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("detach_user_login_events", e))?;
        detached += result.rows_affected;

        let result = RequestEvent::update_many()
            .col_expr(
                request_event::Column::UserId,
                Expr::value(Value::BigInt(None)),
            )
            .filter(request_event::Column::UserId.eq(user_pk))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("detach_user_request_events", e))?;
        detached += result.rows_affected;

        tracing::info!("Detached user {} from {} audit events", user_pk, detached);
        Ok(detached)
    }

    /// Drop a registration and every CRUD event recorded under it
    ///
    /// Returns the number of event rows removed. Fails without touching
    /// anything when the entity type was never registered.
    pub async fn purge_content_type(&self, entity_type: &str) -> Result<u64, RecorderError> {
        let registered = self.content_types.lookup(entity_type).await?;
        let mut purged = 0;

        let result = CrudEvent::delete_many()
            .filter(crud_event::Column::ContentTypeId.eq(registered.id))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("purge_crud_events", e))?;
        purged += result.rows_affected;

        let result = CrudEventBigInteger::delete_many()
            .filter(crud_event_big_integer::Column::ContentTypeId.eq(registered.id))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("purge_crud_events_big_integer", e))?;
        purged += result.rows_affected;

        let result = CrudEventUuid::delete_many()
            .filter(crud_event_uuid::Column::ContentTypeId.eq(registered.id))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("purge_crud_events_uuid", e))?;
        purged += result.rows_affected;

        ContentType::delete_by_id(registered.id)
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("purge_content_type", e))?;
        self.content_types.evict(entity_type);

        tracing::info!(
            "Purged content type '{}' and {} recorded events",
            entity_type,
            purged
        );
        Ok(purged)
    }

    /// Delete every event older than the cutoff, across all event families
    ///
    /// The cutoff is exclusive: an event stamped exactly at the cutoff
    /// survives.
    pub async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<u64, RecorderError> {
        let mut pruned = 0;

        let result = CrudEvent::delete_many()
            .filter(crud_event::Column::Datetime.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("prune_crud_events", e))?;
        pruned += result.rows_affected;

        let result = CrudEventBigInteger::delete_many()
            .filter(crud_event_big_integer::Column::Datetime.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("prune_crud_events_big_integer", e))?;
        pruned += result.rows_affected;

        let result = CrudEventUuid::delete_many()
            .filter(crud_event_uuid::Column::Datetime.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("prune_crud_events_uuid", e))?;
        pruned += result.rows_affected;

        let result = LoginEvent::delete_many()
            .filter(login_event::Column::Datetime.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("prune_login_events", e))?;
        pruned += result.rows_affected;

        let result = RequestEvent::delete_many()
            .filter(request_event::Column::Datetime.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(|e| RecorderError::database("prune_request_events", e))?;
        pruned += result.rows_affected;

        tracing::info!("Pruned {} audit events older than {}", pruned, cutoff);
        Ok(pruned)
    }
}
