// Stores layer - Data access and repository pattern
pub mod cleanup_store;
pub mod content_type_store;
pub mod event_query_store;
pub mod event_store;

pub use cleanup_store::CleanupStore;
pub use content_type_store::{ContentTypeStore, RegisteredType};
pub use event_query_store::{EventQueryStore, TimeRange};
pub use event_store::EventStore;
