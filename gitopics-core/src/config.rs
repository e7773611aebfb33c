//! Configuration management
//!
//! Settings are loaded once at startup and injected into the components that
//! need them; nothing reads configuration from ambient global state.

use crate::error::{ErrorContext, GitopicsError, GitopicsResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitopicsConfig {
    pub api: ApiConfig,
    pub model: ModelConfig,
}

/// GitHub API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API
    pub base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Topic model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the persisted topic-model state
    pub state_path: Option<String>,
}

impl Default for GitopicsConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://api.github.com".to_string(),
                user_agent: "gitopics/0.1".to_string(),
                timeout_seconds: 30,
            },
            model: ModelConfig { state_path: None },
        }
    }
}

impl GitopicsConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> GitopicsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GitopicsError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: GitopicsConfig =
            toml::from_str(&content).map_err(|e| GitopicsError::Config {
                message: format!("Failed to parse config: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config")
                    .with_operation("parse_toml")
                    .with_suggestion("Check TOML syntax in config file"),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> GitopicsResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| GitopicsError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| GitopicsError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> GitopicsResult<()> {
        if self.api.base_url.is_empty() {
            return Err(GitopicsError::Config {
                message: "API base_url must not be empty".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set api.base_url, e.g. https://api.github.com"),
            });
        }

        if self.api.timeout_seconds == 0 {
            return Err(GitopicsError::Config {
                message: "API timeout_seconds must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set api.timeout_seconds to a positive value"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GitopicsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "https://api.github.com");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = GitopicsConfig::default();
        config.api.timeout_seconds = 0;
        let result = config.validate();
        assert!(result.is_err());
        match result.unwrap_err() {
            GitopicsError::Config { message, .. } => {
                assert!(message.contains("timeout_seconds"));
            }
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let mut config = GitopicsConfig::default();
        config.api.base_url = String::new();
        assert!(config.validate().is_err());
    }
}
