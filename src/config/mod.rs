//! Configuration module for Waypoint
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`WAYPOINT_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use waypoint::config::WaypointConfig;
//!
//! let config = WaypointConfig::default();
//! assert_eq!(config.form.debounce_ms, 500);
//!
//! let toml = r#"
//! [form]
//! debounce_ms = 250
//! "#;
//! let config: WaypointConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.form.debounce_ms, 250);
//! assert!(config.form.optimize_waypoints);
//! ```

pub mod error;
pub mod form;
pub mod logging;
pub mod provider;

pub use error::ConfigError;
pub use form::FormConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use provider::{ProviderConfig, ProviderKind};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the planner.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WaypointConfig {
    /// Mapping provider settings
    pub provider: ProviderConfig,
    /// Address form behaviour
    pub form: FormConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl WaypointConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports WAYPOINT_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(kind) = std::env::var("WAYPOINT_PROVIDER") {
            if let Ok(k) = kind.parse() {
                self.provider.kind = k;
            }
        }
        if let Ok(url) = std::env::var("WAYPOINT_BASE_URL") {
            self.provider.base_url = Some(url);
        }

        if let Ok(debounce) = std::env::var("WAYPOINT_DEBOUNCE_MS") {
            if let Ok(ms) = debounce.parse() {
                self.form.debounce_ms = ms;
            }
        }
        if let Ok(optimize) = std::env::var("WAYPOINT_OPTIMIZE") {
            self.form.optimize_waypoints = optimize.to_lowercase() == "true";
        }

        if let Ok(level) = std::env::var("WAYPOINT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("WAYPOINT_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "provider.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        if let Some(url) = &self.provider.base_url {
            if url.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: "provider.base_url".to_string(),
                    message: "URL cannot be empty".to_string(),
                });
            }
        }

        if self.provider.api_key_env.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "provider.api_key_env".to_string(),
                message: "variable name cannot be empty".to_string(),
            });
        }

        if let Some(region) = &self.provider.region {
            if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::Validation {
                    field: "provider.region".to_string(),
                    message: format!("expected a two-letter country code, got '{}'", region),
                });
            }
        }

        Ok(())
    }
}
