//! Provider factory for creating PlacesProvider trait objects from configuration.

use super::{google::GoogleMapsProvider, ors::OrsProvider, PlacesProvider, ProviderError};
use crate::config::{ProviderConfig, ProviderKind};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Create a provider from configuration.
///
/// The API key is resolved here (inline value or environment variable) so a
/// misconfigured session fails before the first keystroke.
///
/// # Examples
///
/// ```
/// use waypoint::config::ProviderConfig;
/// use waypoint::provider::factory::create_provider;
/// use reqwest::Client;
/// use std::sync::Arc;
///
/// let config = ProviderConfig {
///     api_key: Some("test-key".to_string()),
///     ..Default::default()
/// };
/// let provider = create_provider(&config, Arc::new(Client::new())).unwrap();
/// assert_eq!(provider.name(), "google");
/// ```
pub fn create_provider(
    config: &ProviderConfig,
    client: Arc<Client>,
) -> Result<Arc<dyn PlacesProvider>, ProviderError> {
    let api_key = config
        .resolve_api_key()
        .map_err(|e| ProviderError::Configuration(e.to_string()))?;
    let base_url = config.effective_base_url();
    let timeout = Duration::from_secs(config.timeout_seconds);

    tracing::debug!(
        provider = ?config.kind,
        base_url = %base_url,
        "Creating mapping provider"
    );

    match config.kind {
        ProviderKind::Google => Ok(Arc::new(
            GoogleMapsProvider::new(base_url, api_key, timeout, client)
                .with_language(config.language.clone())
                .with_region(config.region.clone()),
        )),
        ProviderKind::OpenRouteService => Ok(Arc::new(
            OrsProvider::new(base_url, api_key, timeout, client)
                .with_language(config.language.clone())
                .with_region(config.region.clone()),
        )),
    }
}
