use thiserror::Error;

use crate::types::internal::key::{KeyVariant, PrimaryKeyKind};

/// Errors raised by the content-type registry
///
/// Unsupported key kinds fail at registration time so that record-time
/// submissions never have to deal with them.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Unsupported key type for {entity_type}: {kind} has no storage variant")]
    UnsupportedKeyType {
        entity_type: String,
        kind: PrimaryKeyKind,
    },

    #[error("Unknown entity type: {0} is not registered")]
    UnknownEntityType(String),

    #[error("Variant conflict for {entity_type}: registered as {registered}, requested {requested}")]
    VariantConflict {
        entity_type: String,
        registered: KeyVariant,
        requested: KeyVariant,
    },
}
