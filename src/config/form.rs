//! Address form configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Address form behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Quiet time after the last edit before a suggestion lookup is issued
    pub debounce_ms: u64,
    /// Ask the provider to reorder stops for a shorter route
    pub optimize_waypoints: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            optimize_waypoints: true,
        }
    }
}

impl FormConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_config_defaults() {
        let config = FormConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert!(config.optimize_waypoints);
    }
}
