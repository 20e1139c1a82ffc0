/// Environment variable access behind a trait
///
/// Settings loaders take a provider instead of reading the process
/// environment directly, so tests can inject values without mutating
/// shared global state.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Provider backed by the process environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed-map provider for tests
#[cfg(test)]
pub struct MockEnvironment {
    vars: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn empty() -> Self {
        Self {
            vars: std::collections::HashMap::new(),
        }
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_environment_reads_process_vars() {
        std::env::set_var("AUDIT_TRAIL_ENV_PROBE", "probe_value");

        let provider = SystemEnvironment;
        assert_eq!(
            provider.get_var("AUDIT_TRAIL_ENV_PROBE"),
            Some("probe_value".to_string())
        );
        assert_eq!(provider.get_var("AUDIT_TRAIL_ENV_PROBE_MISSING"), None);

        std::env::remove_var("AUDIT_TRAIL_ENV_PROBE");
    }

    #[test]
    fn test_mock_environment_only_knows_injected_vars() {
        let provider = MockEnvironment::empty().with_var("KEY", "value");

        assert_eq!(provider.get_var("KEY"), Some("value".to_string()));
        assert_eq!(provider.get_var("OTHER"), None);
    }
}
