use chrono::{DateTime, Utc};

use crate::types::internal::event::{CrudEventKind, EventFamily, EventId, LoginKind};
use crate::types::internal::key::ObjectId;

/// Unified read shape over the three CRUD variant tables
///
/// Composition instead of inheritance: the object id carries its variant
/// tag, everything else is identical across the tables.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudEventRecord {
    pub id: EventId,
    pub kind: CrudEventKind,
    pub content_type_id: i32,
    pub object_id: ObjectId,
    pub object_repr: Option<String>,
    pub object_json_repr: Option<String>,
    pub changed_fields: Option<String>,
    pub user_id: Option<i64>,
    pub user_pk_as_string: Option<String>,
    pub datetime: DateTime<Utc>,
}

impl CrudEventRecord {
    pub fn is_create(&self) -> bool {
        self.kind.is_create()
    }

    pub fn is_update(&self) -> bool {
        self.kind.is_update()
    }

    pub fn is_delete(&self) -> bool {
        self.kind.is_delete()
    }
}

/// One login_events row
#[derive(Debug, Clone, PartialEq)]
pub struct LoginEventRecord {
    pub id: EventId,
    pub kind: LoginKind,
    pub username: Option<String>,
    pub user_id: Option<i64>,
    pub remote_ip: Option<String>,
    pub datetime: DateTime<Utc>,
}

/// One request_events row
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEventRecord {
    pub id: EventId,
    pub url: String,
    pub method: String,
    pub query_string: Option<String>,
    pub user_id: Option<i64>,
    pub remote_ip: Option<String>,
    pub datetime: DateTime<Utc>,
}

/// Family-tagged union returned by merged queries
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    Crud(CrudEventRecord),
    Login(LoginEventRecord),
    Request(RequestEventRecord),
}

impl RecordedEvent {
    pub fn family(&self) -> EventFamily {
        match self {
            Self::Crud(_) => EventFamily::Crud,
            Self::Login(_) => EventFamily::Login,
            Self::Request(_) => EventFamily::Request,
        }
    }

    pub fn id(&self) -> EventId {
        match self {
            Self::Crud(record) => record.id,
            Self::Login(record) => record.id,
            Self::Request(record) => record.id,
        }
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        match self {
            Self::Crud(record) => record.datetime,
            Self::Login(record) => record.datetime,
            Self::Request(record) => record.datetime,
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            Self::Crud(record) => record.user_id,
            Self::Login(record) => record.user_id,
            Self::Request(record) => record.user_id,
        }
    }
}
