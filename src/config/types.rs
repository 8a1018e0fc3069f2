//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/bankbench/) and project (.bankbench/) level configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{fetch as fetch_constants, network, selection as selection_constants};
use crate::types::{BenchError, Result};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Backend API settings
    pub api: ApiConfig,

    /// Fetch orchestration settings
    pub fetch: FetchConfig,

    /// Selection rules
    pub selection: SelectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            api: ApiConfig::default(),
            fetch: FetchConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `BenchError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(BenchError::Config("api.base_url must not be empty".to_string()));
        }

        if self.api.timeout_secs == 0 {
            return Err(BenchError::Config(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }

        let interval = self.fetch.refetch_interval_ms;
        if interval != 0 && interval < fetch_constants::MIN_REFETCH_INTERVAL_MS {
            return Err(BenchError::Config(format!(
                "fetch.refetch_interval_ms must be 0 (disabled) or at least {}, got {}",
                fetch_constants::MIN_REFETCH_INTERVAL_MS,
                interval
            )));
        }

        if self.selection.min_entities == 0 {
            return Err(BenchError::Config(
                "selection.min_entities must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// API Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL, e.g. http://localhost:8000/api
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: network::DEFAULT_API_BASE.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Fetch Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Master switch for remote retrieval
    pub enabled: bool,
    /// Periodic refresh interval (0 = disabled)
    pub refetch_interval_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refetch_interval_ms: fetch_constants::DEFAULT_REFETCH_INTERVAL_MS,
        }
    }
}

// =============================================================================
// Selection Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Banks required before a report is generated
    pub min_entities: usize,
    /// Product used when the user does not pick one
    pub default_product: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_entities: selection_constants::MIN_ENTITIES,
            default_product: selection_constants::DEFAULT_PRODUCT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.fetch.enabled);
        assert_eq!(config.fetch.refetch_interval_ms, 0);
        assert_eq!(config.selection.min_entities, 2);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));
    }

    #[test]
    fn test_validate_refetch_interval() {
        let mut config = Config::default();
        config.fetch.refetch_interval_ms = 10;
        assert!(config.validate().is_err());

        config.fetch.refetch_interval_ms = 5_000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [fetch]
            refetch_interval_ms = 60000
            "#,
        )
        .unwrap();

        assert_eq!(config.fetch.refetch_interval_ms, 60_000);
        assert!(config.fetch.enabled);
        assert_eq!(config.api.base_url, network::DEFAULT_API_BASE);
    }
}
