use std::fmt;

use crate::types::internal::key::{KeyVariant, ObjectId};

/// CRUD event codes persisted in the event_type column
///
/// A closed enum: invalid codes cannot be submitted, only decoded rows can
/// ever carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudEventKind {
    Create = 1,
    Update = 2,
    Delete = 3,
    M2mChange = 4,
    M2mChangeRev = 5,
}

impl CrudEventKind {
    /// Persisted integer code for this kind
    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(CrudEventKind::Create),
            2 => Some(CrudEventKind::Update),
            3 => Some(CrudEventKind::Delete),
            4 => Some(CrudEventKind::M2mChange),
            5 => Some(CrudEventKind::M2mChangeRev),
            _ => None,
        }
    }

    pub fn is_create(self) -> bool {
        matches!(self, Self::Create)
    }

    pub fn is_update(self) -> bool {
        matches!(self, Self::Update)
    }

    pub fn is_delete(self) -> bool {
        matches!(self, Self::Delete)
    }

    /// True for both relation-change directions
    pub fn is_m2m_change(self) -> bool {
        matches!(self, Self::M2mChange | Self::M2mChangeRev)
    }
}

impl fmt::Display for CrudEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::M2mChange => "m2m_change",
            Self::M2mChangeRev => "m2m_change_rev",
        };
        write!(f, "{}", name)
    }
}

/// Login event codes persisted in the login_type column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKind {
    Login = 0,
    Logout = 1,
    Failed = 2,
}

impl LoginKind {
    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(LoginKind::Login),
            1 => Some(LoginKind::Logout),
            2 => Some(LoginKind::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for LoginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Event families exposed by merged queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFamily {
    Crud,
    Login,
    Request,
}

/// Identifier of a persisted event row, qualified by the table it lives in
///
/// Row ids are auto-increment per table, so the qualifier is what makes the
/// identifier unique across the whole trail. Ord gives merged queries a
/// deterministic final tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventId {
    Crud(KeyVariant, i64),
    Login(i64),
    Request(i64),
}

impl EventId {
    /// Auto-increment id within the owning table
    pub fn row_id(&self) -> i64 {
        match self {
            Self::Crud(_, id) | Self::Login(id) | Self::Request(id) => *id,
        }
    }

    pub fn family(&self) -> EventFamily {
        match self {
            Self::Crud(..) => EventFamily::Crud,
            Self::Login(_) => EventFamily::Login,
            Self::Request(_) => EventFamily::Request,
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crud(variant, id) => write!(f, "crud:{}:{}", variant, id),
            Self::Login(id) => write!(f, "login:{}", id),
            Self::Request(id) => write!(f, "request:{}", id),
        }
    }
}

/// Validated CRUD event payload handed to the event store
///
/// Carries no timestamp field; datetime is assigned server-side at the
/// durable write, so backdating is structurally impossible.
#[derive(Debug, Clone)]
pub struct NewCrudEvent {
    pub kind: CrudEventKind,
    pub content_type_id: i32,
    pub object_id: ObjectId,
    pub object_repr: Option<String>,
    pub object_json_repr: Option<String>,
    pub changed_fields: Option<String>,
    pub user_id: Option<i64>,
    pub user_pk_as_string: Option<String>,
}

/// Validated login event payload
#[derive(Debug, Clone)]
pub struct NewLoginEvent {
    pub kind: LoginKind,
    pub username: Option<String>,
    pub user_id: Option<i64>,
    pub remote_ip: Option<String>,
}

/// Validated request event payload
#[derive(Debug, Clone)]
pub struct NewRequestEvent {
    pub url: String,
    pub method: String,
    pub query_string: Option<String>,
    pub user_id: Option<i64>,
    pub remote_ip: Option<String>,
}
