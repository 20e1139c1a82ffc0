use std::sync::Arc;

use crate::config::env_provider::EnvironmentProvider;
use crate::config::errors::ConfigError;

const DATABASE_URL_VAR: &str = "AUDIT_DATABASE_URL";
const DEFAULT_DATABASE_URL: &str = "sqlite://audit.db?mode=rwc";

/// Infrastructure settings for the recorder
///
/// The trail keeps its own connection, so the only bootstrap setting is
/// where that database lives.
#[derive(Debug, Clone)]
pub struct RecorderSettings {
    database_url: String,
}

impl RecorderSettings {
    /// Load settings from the given environment provider
    ///
    /// `AUDIT_DATABASE_URL` falls back to an on-disk sqlite database when
    /// unset; an explicitly empty value is rejected rather than silently
    /// replaced.
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ConfigError> {
        let database_url = match env_provider.get_var(DATABASE_URL_VAR) {
            Some(value) if value.is_empty() => {
                return Err(ConfigError::InvalidSetting {
                    setting_name: DATABASE_URL_VAR.to_string(),
                    reason: "cannot be empty".to_string(),
                })
            }
            Some(value) => value,
            None => DEFAULT_DATABASE_URL.to_string(),
        };

        Ok(Self { database_url })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ConfigError> {
        use crate::config::env_provider::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}
