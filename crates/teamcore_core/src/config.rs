//! Runtime configuration for the client core.
//!
//! # Invariants
//! - Every field has a default, so an empty JSON object is a valid config.
//! - `storage_prefix` is non-empty `[a-z0-9_]`.
//! - `max_notifications` is at least 1.

use crate::repo::kv_repo::StorageKeys;
use crate::service::latency::FixedLatency;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Product prefix for persisted keys.
pub const DEFAULT_STORAGE_PREFIX: &str = "teamcore";
/// Pause applied before mock login/registration resolves.
pub const DEFAULT_SIMULATED_LATENCY_MS: u64 = 500;
/// Notification list capacity.
pub const DEFAULT_MAX_NOTIFICATIONS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub storage_prefix: String,
    pub simulated_latency_ms: u64,
    pub max_notifications: usize,
    /// Seeds the demo directory on first start.
    pub seed_demo_directory: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            simulated_latency_ms: DEFAULT_SIMULATED_LATENCY_MS,
            max_notifications: DEFAULT_MAX_NOTIFICATIONS,
            seed_demo_directory: true,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = self.storage_prefix.as_str();
        if prefix.is_empty() {
            return Err(ConfigError::EmptyStoragePrefix);
        }
        if !prefix
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
        {
            return Err(ConfigError::InvalidStoragePrefix(prefix.to_string()));
        }
        if self.max_notifications == 0 {
            return Err(ConfigError::ZeroNotificationCapacity);
        }
        Ok(())
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.storage_prefix)
    }

    pub fn latency(&self) -> FixedLatency {
        FixedLatency::from_millis(self.simulated_latency_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    EmptyStoragePrefix,
    InvalidStoragePrefix(String),
    ZeroNotificationCapacity,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid config document: {message}"),
            Self::EmptyStoragePrefix => write!(f, "storage_prefix must not be empty"),
            Self::InvalidStoragePrefix(value) => write!(
                f,
                "storage_prefix `{value}` must contain only lowercase letters, digits or `_`"
            ),
            Self::ZeroNotificationCapacity => write!(f, "max_notifications must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};

    #[test]
    fn empty_document_yields_defaults() {
        let config = CoreConfig::from_json_str("{}").expect("defaults");
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.storage_keys().users, "teamcore:users");
        assert_eq!(config.latency().delay().as_millis(), 500);
    }

    #[test]
    fn overrides_are_applied() {
        let config = CoreConfig::from_json_str(
            r#"{"storage_prefix":"qa_env","simulated_latency_ms":0,"max_notifications":5}"#,
        )
        .expect("parse");
        assert_eq!(config.storage_prefix, "qa_env");
        assert_eq!(config.simulated_latency_ms, 0);
        assert_eq!(config.max_notifications, 5);
        assert!(config.seed_demo_directory);
    }

    #[test]
    fn rejects_bad_prefix_and_capacity() {
        assert_eq!(
            CoreConfig::from_json_str(r#"{"storage_prefix":""}"#),
            Err(ConfigError::EmptyStoragePrefix)
        );
        assert_eq!(
            CoreConfig::from_json_str(r#"{"storage_prefix":"Team Core"}"#),
            Err(ConfigError::InvalidStoragePrefix("Team Core".to_string()))
        );
        assert_eq!(
            CoreConfig::from_json_str(r#"{"max_notifications":0}"#),
            Err(ConfigError::ZeroNotificationCapacity)
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = CoreConfig::from_json_str(r#"{"verify_passwords":true}"#)
            .expect_err("unknown field must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
