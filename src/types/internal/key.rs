use std::fmt;

use uuid::Uuid;

use crate::errors::internal::RegistryError;

/// Primary key shapes a tracked entity can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeyKind {
    Integer,
    BigInteger,
    Uuid,
    Text,
    Composite,
}

impl fmt::Display for PrimaryKeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::BigInteger => "big_integer",
            Self::Uuid => "uuid",
            Self::Text => "text",
            Self::Composite => "composite",
        };
        write!(f, "{}", name)
    }
}

/// Storage variant backing a content type
///
/// The code is persisted in content_types.key_variant, which is what keeps
/// the resolved variant stable for the lifetime of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyVariant {
    Integer = 1,
    BigInteger = 2,
    Uuid = 3,
}

impl KeyVariant {
    /// Resolve a declared key kind to its storage variant
    ///
    /// Pure and deterministic. Text and composite keys have no variant and
    /// are rejected here, at registration time, never at record time.
    pub fn resolve(entity_type: &str, kind: PrimaryKeyKind) -> Result<Self, RegistryError> {
        match kind {
            PrimaryKeyKind::Integer => Ok(KeyVariant::Integer),
            PrimaryKeyKind::BigInteger => Ok(KeyVariant::BigInteger),
            PrimaryKeyKind::Uuid => Ok(KeyVariant::Uuid),
            PrimaryKeyKind::Text | PrimaryKeyKind::Composite => {
                Err(RegistryError::UnsupportedKeyType {
                    entity_type: entity_type.to_string(),
                    kind,
                })
            }
        }
    }

    /// Persisted integer code for this variant
    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(KeyVariant::Integer),
            2 => Some(KeyVariant::BigInteger),
            3 => Some(KeyVariant::Uuid),
            _ => None,
        }
    }
}

impl fmt::Display for KeyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::BigInteger => "big_integer",
            Self::Uuid => "uuid",
        };
        write!(f, "{}", name)
    }
}

/// Primary key value of an audited row, tagged with its storage variant
///
/// The variant is statically known from the carried value, so query-side
/// table inference never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectId {
    Integer(i32),
    BigInteger(i64),
    Uuid(Uuid),
}

impl ObjectId {
    pub fn variant(&self) -> KeyVariant {
        match self {
            Self::Integer(_) => KeyVariant::Integer,
            Self::BigInteger(_) => KeyVariant::BigInteger,
            Self::Uuid(_) => KeyVariant::Uuid,
        }
    }
}

impl From<i32> for ObjectId {
    fn from(value: i32) -> Self {
        ObjectId::Integer(value)
    }
}

impl From<i64> for ObjectId {
    fn from(value: i64) -> Self {
        ObjectId::BigInteger(value)
    }
}

impl From<Uuid> for ObjectId {
    fn from(value: Uuid) -> Self {
        ObjectId::Uuid(value)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::BigInteger(value) => write!(f, "{}", value),
            Self::Uuid(value) => write!(f, "{}", value),
        }
    }
}
