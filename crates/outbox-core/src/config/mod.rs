//! Configuration for the outbox store.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{OutboxError, OutboxResult};
use crate::types::DEFAULT_KEY_NAMESPACE;

/// Default label attached to storage log events.
pub const DEFAULT_DEBUG_LABEL: &str = "outbox_storage";

/// Main outbox configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutboxConfig {
    /// Path to the SQLite database backing the store.
    pub db_path: PathBuf,
    /// Namespace tag prefixed to every persistence key.
    pub key_namespace: String,
    /// Label carried by every log event the storage emits.
    pub debug_label: String,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        let outbox_dir = dirs::home_dir()
            .map(|h| h.join(".outbox"))
            .unwrap_or_else(|| PathBuf::from(".outbox"));

        Self {
            db_path: outbox_dir.join("outbox.db"),
            key_namespace: DEFAULT_KEY_NAMESPACE.to_string(),
            debug_label: DEFAULT_DEBUG_LABEL.to_string(),
        }
    }
}

impl OutboxConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> OutboxResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| OutboxError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| OutboxError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| OutboxError::Configuration(e.to_string()))?,
            _ => {
                return Err(OutboxError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("OUTBOX_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(namespace) = std::env::var("OUTBOX_KEY_NAMESPACE") {
            config.key_namespace = namespace;
        }
        if let Ok(label) = std::env::var("OUTBOX_DEBUG_LABEL") {
            config.debug_label = label;
        }

        config
    }

    /// Check that keys built from this configuration are well formed.
    pub fn validate(&self) -> OutboxResult<()> {
        if self.key_namespace.is_empty() {
            return Err(OutboxError::Configuration(
                "key_namespace must not be empty".to_string(),
            ));
        }
        if self.key_namespace.contains(':') {
            return Err(OutboxError::Configuration(format!(
                "key_namespace '{}' must not contain ':'",
                self.key_namespace
            )));
        }
        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> OutboxConfigBuilder {
        OutboxConfigBuilder::default()
    }
}

/// Builder for OutboxConfig.
#[derive(Default)]
pub struct OutboxConfigBuilder {
    config: OutboxConfig,
}

impl OutboxConfigBuilder {
    /// Set the database path.
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Set the key namespace.
    pub fn key_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.key_namespace = namespace.into();
        self
    }

    /// Set the debug label.
    pub fn debug_label(mut self, label: impl Into<String>) -> Self {
        self.config.debug_label = label.into();
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> OutboxResult<OutboxConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
