// Library exports for integration tests and embedders

pub mod codec;
pub mod config;
pub mod errors;
pub mod recorder;
pub mod stores;
pub mod trail;
pub mod types;

pub use trail::AuditTrail;
