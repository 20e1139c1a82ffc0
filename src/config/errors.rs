use thiserror::Error;

/// Settings-loading failures, surfaced before any connection is attempted
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid setting {setting_name}: {reason}")]
    InvalidSetting {
        setting_name: String,
        reason: String,
    },
}
