use thiserror::Error;

use crate::types::internal::key::KeyVariant;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Key variant mismatch for {entity_type}: registered as {registered}, object id is {submitted}")]
    KeyVariantMismatch {
        entity_type: String,
        registered: KeyVariant,
        submitted: KeyVariant,
    },
}
