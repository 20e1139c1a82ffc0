pub mod crud_draft;
pub mod event_recorder;
pub mod login;
pub mod request;
pub mod tracked;

pub use crud_draft::CrudEventDraft;
pub use event_recorder::EventRecorder;
pub use tracked::Tracked;
