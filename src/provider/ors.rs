//! OpenRouteService provider implementation.
//!
//! Suggestions come from the Pelias-backed `/geocode/autocomplete` endpoint.
//! Routes are computed by geocoding every stop with `/geocode/search` and
//! posting the coordinates to `/v2/directions/driving-car`. The directions
//! endpoint visits coordinates in the given order, so waypoint optimization
//! is not available here.

use super::{PlacesProvider, ProviderError, RouteLeg, RouteRequest, RouteResult, Suggestion};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Default endpoint for the hosted OpenRouteService API.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// ORS error code for a coordinate that cannot be snapped to the road network.
const UNROUTABLE_POINT_CODE: &str = "2010";

type Coord = (f64, f64);

/// OpenRouteService geocoding/directions provider.
pub struct OrsProvider {
    base_url: String,
    api_key: String,
    language: Option<String>,
    region: Option<String>,
    timeout: Duration,
    client: Arc<Client>,
}

impl OrsProvider {
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

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    async fn geocode_request(
        &self,
        path: &str,
        text: &str,
        size: Option<usize>,
    ) -> Result<GeoResponse, ProviderError> {
        let url = format!("{}{}", self.base_url, path);

        let mut query = vec![
            ("api_key", self.api_key.clone()),
            ("text", text.to_string()),
        ];
        if let Some(size) = size {
            query.push(("size", size.to_string()));
        }
        if let Some(language) = &self.language {
            query.push(("lang", language.clone()));
        }
        if let Some(region) = &self.region {
            query.push(("boundary.country", region.clone()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
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

        response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse geocode response: {}", e))
        })
    }

    async fn geocode(&self, address: &str) -> Result<Coord, ProviderError> {
        let response = self
            .geocode_request("/geocode/search", address, Some(1))
            .await?;

        let coordinates = response
            .features
            .first()
            .ok_or_else(|| ProviderError::Status {
                status: "NOT_FOUND".to_string(),
                message: Some(format!("No geocode results for: {}", address)),
            })?
            .geometry
            .coordinates;

        Ok((coordinates[0], coordinates[1]))
    }
}

#[derive(Deserialize)]
struct GeoResponse {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Geometry,
    properties: Properties,
}

#[derive(Deserialize)]
struct Geometry {
    coordinates: [f64; 2],
}

#[derive(Deserialize)]
struct Properties {
    gid: Option<String>,
    id: Option<String>,
    label: String,
}

#[derive(Deserialize)]
struct DirectionsResponse {
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct Route {
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Deserialize)]
struct Segment {
    distance: f64,
    duration: f64,
}

#[async_trait]
impl PlacesProvider for OrsProvider {
    fn name(&self) -> &str {
        "openrouteservice"
    }

    async fn place_predictions(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError> {
        let response = self
            .geocode_request("/geocode/autocomplete", query, None)
            .await?;

        Ok(response
            .features
            .into_iter()
            .map(|feature| {
                let Properties { gid, id, label } = feature.properties;
                let id = gid.or(id).unwrap_or_else(|| label.clone());
                Suggestion::new(id, label)
            })
            .collect())
    }

    async fn compute_route(&self, request: &RouteRequest) -> Result<RouteResult, ProviderError> {
        if request.optimize && request.waypoints.len() > 1 {
            tracing::debug!(
                waypoints = request.waypoints.len(),
                "OpenRouteService directions keep waypoint order; optimization ignored"
            );
        }

        let stops: Vec<&str> = std::iter::once(request.origin.as_str())
            .chain(request.waypoints.iter().map(String::as_str))
            .chain(std::iter::once(request.destination.as_str()))
            .collect();

        let mut coordinates = Vec::with_capacity(stops.len());
        for stop in &stops {
            let (lon, lat) = self.geocode(stop).await?;
            coordinates.push([lon, lat]);
        }

        let url = format!("{}/v2/directions/driving-car", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&json!({ "coordinates": coordinates }))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, self.timeout_ms()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            if text.contains(UNROUTABLE_POINT_CODE) {
                return Err(ProviderError::Status {
                    status: "UNROUTABLE_POINT".to_string(),
                    message: Some(text),
                });
            }
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message: text,
            });
        }

        let directions: DirectionsResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse directions response: {}", e))
        })?;

        let route = directions.routes.into_iter().next().ok_or_else(|| {
            ProviderError::InvalidResponse("No route found in success response".to_string())
        })?;

        let legs = route
            .segments
            .iter()
            .zip(stops.windows(2))
            .map(|(segment, pair)| RouteLeg {
                start_address: pair[0].to_string(),
                end_address: pair[1].to_string(),
                distance_meters: segment.distance.round() as u64,
                duration_seconds: segment.duration.round() as u64,
            })
            .collect();

        Ok(RouteResult {
            summary: String::new(),
            legs,
            waypoint_order: (0..request.waypoints.len()).collect(),
        })
    }
}
