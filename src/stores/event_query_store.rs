use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::errors::internal::{QueryError, RecorderError};
use crate::stores::content_type_store::ContentTypeStore;
use crate::types::db::crud_event::{self, Entity as CrudEvent};
use crate::types::db::crud_event_big_integer::{self, Entity as CrudEventBigInteger};
use crate::types::db::crud_event_uuid::{self, Entity as CrudEventUuid};
use crate::types::db::login_event::{self, Entity as LoginEvent};
use crate::types::db::request_event::{self, Entity as RequestEvent};
use crate::types::internal::event::{CrudEventKind, EventFamily, EventId, LoginKind};
use crate::types::internal::key::{KeyVariant, ObjectId};
use crate::types::internal::record::{
    CrudEventRecord, LoginEventRecord, RecordedEvent, RequestEventRecord,
};

/// Inclusive time window for event queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Construct an inclusive range; fails when end precedes start
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, QueryError> {
        if end < start {
            return Err(QueryError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// Read-only query surface over the recorded trail
///
/// Canonical ordering everywhere is datetime descending with id descending
/// as the tie-break; merged queries add the variant tag as a final
/// deterministic tie-break so pagination never duplicates or skips a row.
pub struct EventQueryStore {
    db: DatabaseConnection,
    content_types: Arc<ContentTypeStore>,
}

impl EventQueryStore {
    pub fn new(db: DatabaseConnection, content_types: Arc<ContentTypeStore>) -> Self {
        Self { db, content_types }
    }

    /// Full change history of one audited row, newest first
    ///
    /// The variant table is inferred from the object id value itself; a
    /// value whose variant disagrees with the registration simply finds no
    /// rows, since record time is where mismatches get rejected.
    pub async fn history_of(
        &self,
        entity_type: &str,
        object_id: ObjectId,
    ) -> Result<Vec<CrudEventRecord>, RecorderError> {
        let registered = self.content_types.lookup(entity_type).await?;

        match object_id {
            ObjectId::Integer(value) => {
                let rows = CrudEvent::find()
                    .filter(crud_event::Column::ObjectId.eq(value))
                    .filter(crud_event::Column::ContentTypeId.eq(registered.id))
                    .order_by_desc(crud_event::Column::Datetime)
                    .order_by_desc(crud_event::Column::Id)
                    .all(&self.db)
                    .await
                    .map_err(|e| RecorderError::database("history_of_crud_events", e))?;
                rows.into_iter().map(integer_record).collect()
            }
            ObjectId::BigInteger(value) => {
                let rows = CrudEventBigInteger::find()
                    .filter(crud_event_big_integer::Column::ObjectId.eq(value))
                    .filter(crud_event_big_integer::Column::ContentTypeId.eq(registered.id))
                    .order_by_desc(crud_event_big_integer::Column::Datetime)
                    .order_by_desc(crud_event_big_integer::Column::Id)
                    .all(&self.db)
                    .await
                    .map_err(|e| {
                        RecorderError::database("history_of_crud_events_big_integer", e)
                    })?;
                rows.into_iter().map(big_integer_record).collect()
            }
            ObjectId::Uuid(value) => {
                let rows = CrudEventUuid::find()
                    .filter(crud_event_uuid::Column::ObjectId.eq(value))
                    .filter(crud_event_uuid::Column::ContentTypeId.eq(registered.id))
                    .order_by_desc(crud_event_uuid::Column::Datetime)
                    .order_by_desc(crud_event_uuid::Column::Id)
                    .all(&self.db)
                    .await
                    .map_err(|e| RecorderError::database("history_of_crud_events_uuid", e))?;
                rows.into_iter().map(uuid_record).collect()
            }
        }
    }

    /// Everything one user did, merged across all event families
    ///
    /// The range is inclusive on both ends. The limit bounds each per-table
    /// scan as well as the merged result, since range scans are the main
    /// latency risk here.
    pub async fn by_user(
        &self,
        user_pk: i64,
        range: Option<TimeRange>,
        limit: Option<u64>,
    ) -> Result<Vec<RecordedEvent>, RecorderError> {
        let mut events: Vec<RecordedEvent> = Vec::new();

        let mut query = CrudEvent::find().filter(crud_event::Column::UserId.eq(user_pk));
        if let Some(range) = range {
            query = query.filter(crud_event::Column::Datetime.between(range.start(), range.end()));
        }
        let rows = query
            .order_by_desc(crud_event::Column::Datetime)
            .order_by_desc(crud_event::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RecorderError::database("by_user_crud_events", e))?;
        for row in rows {
            events.push(RecordedEvent::Crud(integer_record(row)?));
        }

        let mut query =
            CrudEventBigInteger::find().filter(crud_event_big_integer::Column::UserId.eq(user_pk));
        if let Some(range) = range {
            query = query.filter(
                crud_event_big_integer::Column::Datetime.between(range.start(), range.end()),
            );
        }
        let rows = query
            .order_by_desc(crud_event_big_integer::Column::Datetime)
            .order_by_desc(crud_event_big_integer::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RecorderError::database("by_user_crud_events_big_integer", e))?;
        for row in rows {
            events.push(RecordedEvent::Crud(big_integer_record(row)?));
        }

        let mut query = CrudEventUuid::find().filter(crud_event_uuid::Column::UserId.eq(user_pk));
        if let Some(range) = range {
            query = query
                .filter(crud_event_uuid::Column::Datetime.between(range.start(), range.end()));
        }
        let rows = query
            .order_by_desc(crud_event_uuid::Column::Datetime)
            .order_by_desc(crud_event_uuid::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RecorderError::database("by_user_crud_events_uuid", e))?;
        for row in rows {
            events.push(RecordedEvent::Crud(uuid_record(row)?));
        }

        let mut query = LoginEvent::find().filter(login_event::Column::UserId.eq(user_pk));
        if let Some(range) = range {
            query = query.filter(login_event::Column::Datetime.between(range.start(), range.end()));
        }
        let rows = query
            .order_by_desc(login_event::Column::Datetime)
            .order_by_desc(login_event::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RecorderError::database("by_user_login_events", e))?;
        for row in rows {
            events.push(RecordedEvent::Login(login_record(row)?));
        }

        let mut query = RequestEvent::find().filter(request_event::Column::UserId.eq(user_pk));
        if let Some(range) = range {
            query =
                query.filter(request_event::Column::Datetime.between(range.start(), range.end()));
        }
        let rows = query
            .order_by_desc(request_event::Column::Datetime)
            .order_by_desc(request_event::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RecorderError::database("by_user_request_events", e))?;
        for row in rows {
            events.push(RecordedEvent::Request(request_record(row)?));
        }

        sort_merged(&mut events);
        if let Some(limit) = limit {
            events.truncate(limit as usize);
        }
        Ok(events)
    }

    /// Paginated listing of one event family, newest first
    pub async fn recent(
        &self,
        family: EventFamily,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<RecordedEvent>, RecorderError> {
        match family {
            EventFamily::Crud => Ok(self
                .recent_crud(limit, offset)
                .await?
                .into_iter()
                .map(RecordedEvent::Crud)
                .collect()),
            EventFamily::Login => Ok(self
                .recent_login(limit, offset)
                .await?
                .into_iter()
                .map(RecordedEvent::Login)
                .collect()),
            EventFamily::Request => Ok(self
                .recent_request(limit, offset)
                .await?
                .into_iter()
                .map(RecordedEvent::Request)
                .collect()),
        }
    }

    /// Page through CRUD events across all three variant tables
    ///
    /// Each table is scanned up to offset + limit rows so the merged window
    /// is always complete; rows beyond that depth cannot appear on the
    /// requested page.
    pub async fn recent_crud(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<CrudEventRecord>, RecorderError> {
        let fetch = offset.saturating_add(limit);

        let mut records: Vec<CrudEventRecord> = Vec::new();

        let rows = CrudEvent::find()
            .order_by_desc(crud_event::Column::Datetime)
            .order_by_desc(crud_event::Column::Id)
            .limit(fetch)
            .all(&self.db)
            .await
            .map_err(|e| RecorderError::database("recent_crud_events", e))?;
        for row in rows {
            records.push(integer_record(row)?);
        }

        let rows = CrudEventBigInteger::find()
            .order_by_desc(crud_event_big_integer::Column::Datetime)
            .order_by_desc(crud_event_big_integer::Column::Id)
            .limit(fetch)
            .all(&self.db)
            .await
            .map_err(|e| RecorderError::database("recent_crud_events_big_integer", e))?;
        for row in rows {
            records.push(big_integer_record(row)?);
        }

        let rows = CrudEventUuid::find()
            .order_by_desc(crud_event_uuid::Column::Datetime)
            .order_by_desc(crud_event_uuid::Column::Id)
            .limit(fetch)
            .all(&self.db)
            .await
            .map_err(|e| RecorderError::database("recent_crud_events_uuid", e))?;
        for row in rows {
            records.push(uuid_record(row)?);
        }

        records.sort_by_key(|record| (Reverse(record.datetime), Reverse(record.id.row_id()), record.id));

        Ok(records
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    /// Page through login events, newest first
    pub async fn recent_login(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<LoginEventRecord>, RecorderError> {
        let rows = LoginEvent::find()
            .order_by_desc(login_event::Column::Datetime)
            .order_by_desc(login_event::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(|e| RecorderError::database("recent_login_events", e))?;

        rows.into_iter().map(login_record).collect()
    }

    /// Page through request events, newest first
    pub async fn recent_request(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<RequestEventRecord>, RecorderError> {
        let rows = RequestEvent::find()
            .order_by_desc(request_event::Column::Datetime)
            .order_by_desc(request_event::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(|e| RecorderError::database("recent_request_events", e))?;

        rows.into_iter().map(request_record).collect()
    }
}

fn sort_merged(events: &mut [RecordedEvent]) {
    events.sort_by_key(|event| {
        (
            Reverse(event.datetime()),
            Reverse(event.id().row_id()),
            event.id(),
        )
    });
}

fn decode_crud_kind(id: EventId, code: i16) -> Result<CrudEventKind, RecorderError> {
    CrudEventKind::from_code(code).ok_or_else(|| {
        RecorderError::database(
            "decode_event_type",
            DbErr::Custom(format!("event {} has unknown event_type code {}", id, code)),
        )
    })
}

fn decode_login_kind(id: EventId, code: i16) -> Result<LoginKind, RecorderError> {
    LoginKind::from_code(code).ok_or_else(|| {
        RecorderError::database(
            "decode_login_type",
            DbErr::Custom(format!("event {} has unknown login_type code {}", id, code)),
        )
    })
}

fn integer_record(row: crud_event::Model) -> Result<CrudEventRecord, RecorderError> {
    let id = EventId::Crud(KeyVariant::Integer, row.id);
    Ok(CrudEventRecord {
        id,
        kind: decode_crud_kind(id, row.event_type)?,
        content_type_id: row.content_type_id,
        object_id: ObjectId::Integer(row.object_id),
        object_repr: row.object_repr,
        object_json_repr: row.object_json_repr,
        changed_fields: row.changed_fields,
        user_id: row.user_id,
        user_pk_as_string: row.user_pk_as_string,
        datetime: row.datetime,
    })
}

fn big_integer_record(
    row: crud_event_big_integer::Model,
) -> Result<CrudEventRecord, RecorderError> {
    let id = EventId::Crud(KeyVariant::BigInteger, row.id);
    Ok(CrudEventRecord {
        id,
        kind: decode_crud_kind(id, row.event_type)?,
        content_type_id: row.content_type_id,
        object_id: ObjectId::BigInteger(row.object_id),
        object_repr: row.object_repr,
        object_json_repr: row.object_json_repr,
        changed_fields: row.changed_fields,
        user_id: row.user_id,
        user_pk_as_string: row.user_pk_as_string,
        datetime: row.datetime,
    })
}

fn uuid_record(row: crud_event_uuid::Model) -> Result<CrudEventRecord, RecorderError> {
    let id = EventId::Crud(KeyVariant::Uuid, row.id);
    Ok(CrudEventRecord {
        id,
        kind: decode_crud_kind(id, row.event_type)?,
        content_type_id: row.content_type_id,
        object_id: ObjectId::Uuid(row.object_id),
        object_repr: row.object_repr,
        object_json_repr: row.object_json_repr,
        changed_fields: row.changed_fields,
        user_id: row.user_id,
        user_pk_as_string: row.user_pk_as_string,
        datetime: row.datetime,
    })
}

fn login_record(row: login_event::Model) -> Result<LoginEventRecord, RecorderError> {
    let id = EventId::Login(row.id);
    Ok(LoginEventRecord {
        id,
        kind: decode_login_kind(id, row.login_type)?,
        username: row.username,
        user_id: row.user_id,
        remote_ip: row.remote_ip,
        datetime: row.datetime,
    })
}

fn request_record(row: request_event::Model) -> Result<RequestEventRecord, RecorderError> {
    Ok(RequestEventRecord {
        id: EventId::Request(row.id),
        url: row.url,
        method: row.method,
        query_string: row.query_string,
        user_id: row.user_id,
        remote_ip: row.remote_ip,
        datetime: row.datetime,
    })
}
