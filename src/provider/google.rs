//! Google Maps provider implementation.
//!
//! Uses the Places Autocomplete web service for suggestions and the
//! Directions web service (driving mode) for routes. Both endpoints answer
//! HTTP 200 with a `status` string in the body; anything other than `OK`
//! (and `ZERO_RESULTS` for autocomplete) is mapped to `ProviderError::Status`.

use super::{PlacesProvider, ProviderError, RouteLeg, RouteRequest, RouteResult, Suggestion};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Default endpoint for the Google Maps web services.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

const AUTOCOMPLETE_PATH: &str = "/maps/api/place/autocomplete/json";
const DIRECTIONS_PATH: &str = "/maps/api/directions/json";

/// Google Maps places/directions provider.
pub struct GoogleMapsProvider {
    /// Base URL (e.g., "https://maps.googleapis.com")
    base_url: String,
    api_key: String,
    /// Optional result language (e.g., "fr")
    language: Option<String>,
    /// Optional country restriction for predictions (ISO 3166-1 alpha-2)
    region: Option<String>,
    timeout: Duration,
    /// Shared HTTP client for connection pooling
    client: Arc<Client>,
}

impl GoogleMapsProvider {
    pub fn new(base_url: String, api_key: String, timeout: Duration, client: Arc<Client>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            language: None,
            region: None,
            timeout,
            client,
        }
    }

    /// Set the language used for predictions and addresses.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Restrict predictions to a single country.
    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout_ms()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let body = response.text().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to read response body: {}", e))
        })?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse {} response: {}", path, e))
        })
    }

    fn directions_query(&self, request: &RouteRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("origin", request.origin.clone()),
            ("destination", request.destination.clone()),
            ("mode", "driving".to_string()),
        ];

        if !request.waypoints.is_empty() {
            let mut stops = Vec::with_capacity(request.waypoints.len() + 1);
            if request.optimize {
                stops.push("optimize:true".to_string());
            }
            stops.extend(request.waypoints.iter().cloned());
            query.push(("waypoints", stops.join("|")));
        }

        if let Some(language) = &self.language {
            query.push(("language", language.clone()));
        }

        query
    }
}

/// Places Autocomplete response format
#[derive(Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct Prediction {
    description: String,
    place_id: String,
}

/// Directions response format
#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    summary: String,
    legs: Vec<DirectionsLeg>,
    #[serde(default)]
    waypoint_order: Vec<usize>,
}

#[derive(Deserialize)]
struct DirectionsLeg {
    start_address: String,
    end_address: String,
    distance: TextValue,
    duration: TextValue,
}

#[derive(Deserialize)]
struct TextValue {
    value: u64,
}

#[async_trait]
impl PlacesProvider for GoogleMapsProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn place_predictions(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError> {
        let mut params = vec![("input", query.to_string())];
        if let Some(language) = &self.language {
            params.push(("language", language.clone()));
        }
        if let Some(region) = &self.region {
            params.push(("components", format!("country:{}", region)));
        }

        let response: AutocompleteResponse = self.get_json(AUTOCOMPLETE_PATH, &params).await?;

        match response.status.as_str() {
            "OK" => Ok(response
                .predictions
                .into_iter()
                .map(|p| Suggestion::new(p.place_id, p.description))
                .collect()),
            "ZERO_RESULTS" => Ok(vec![]),
            _ => Err(ProviderError::Status {
                status: response.status,
                message: response.error_message,
            }),
        }
    }

    async fn compute_route(&self, request: &RouteRequest) -> Result<RouteResult, ProviderError> {
        let params = self.directions_query(request);
        let response: DirectionsResponse = self.get_json(DIRECTIONS_PATH, &params).await?;

        if response.status != "OK" {
            return Err(ProviderError::Status {
                status: response.status,
                message: response.error_message,
            });
        }

        let route = response.routes.into_iter().next().ok_or_else(|| {
            ProviderError::InvalidResponse("No route found in OK response".to_string())
        })?;

        let waypoint_order = if route.waypoint_order.len() == request.waypoints.len() {
            route.waypoint_order
        } else {
            (0..request.waypoints.len()).collect()
        };

        Ok(RouteResult {
            summary: route.summary,
            legs: route
                .legs
                .into_iter()
                .map(|leg| RouteLeg {
                    start_address: leg.start_address,
                    end_address: leg.end_address,
                    distance_meters: leg.distance.value,
                    duration_seconds: leg.duration.value,
                })
                .collect(),
            waypoint_order,
        })
    }
}
