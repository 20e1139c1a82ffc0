// Internal domain types - event kinds, keys, read records
pub mod event;
pub mod key;
pub mod record;

pub use event::{CrudEventKind, EventFamily, EventId, LoginKind};
pub use key::{KeyVariant, ObjectId, PrimaryKeyKind};
pub use record::{CrudEventRecord, LoginEventRecord, RecordedEvent, RequestEventRecord};
