//! Ring store client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for [`RingStore`](crate::RingStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Upper bound on every metadata read or install, in milliseconds.
    pub timeout_ms: u64,
}

impl StoreConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { timeout_ms: 5_000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_explicit_timeout() {
        let config: StoreConfig = serde_json::from_str(r#"{"timeout_ms": 250}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(StoreConfig::with_timeout(Duration::from_millis(250)), config);
    }
}
