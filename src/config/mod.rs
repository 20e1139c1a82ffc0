pub mod database;
pub mod env_provider;
pub mod errors;
pub mod logging;
pub mod settings;

#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use errors::ConfigError;
pub use logging::{init_logging, LoggingConfig, LoggingError};
pub use settings::RecorderSettings;
