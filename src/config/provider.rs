//! Mapping provider configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hosted mapping service to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Google,
    #[serde(alias = "ors")]
    OpenRouteService,
}

impl ProviderKind {
    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::Google => crate::provider::google::DEFAULT_BASE_URL,
            ProviderKind::OpenRouteService => crate::provider::ors::DEFAULT_BASE_URL,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(ProviderKind::Google),
            "openrouteservice" | "ors" => Ok(ProviderKind::OpenRouteService),
            _ => Err(format!("Invalid provider: {}", s)),
        }
    }
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Override the provider endpoint (tests, proxies)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Inline API key; prefer `api_key_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_seconds: u64,
    /// Result language (e.g., "en", "fr")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Country restriction for suggestions (ISO 3166-1 alpha-2)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Google,
            base_url: None,
            api_key: None,
            api_key_env: "WAYPOINT_API_KEY".to_string(),
            timeout_seconds: 10,
            language: None,
            region: None,
        }
    }
}

impl ProviderConfig {
    /// Endpoint to use, falling back to the provider's public URL.
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.kind.default_base_url().to_string())
    }

    /// Resolve the API key: inline value first, then the configured env var.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(self.api_key_env.clone()))
    }
}
