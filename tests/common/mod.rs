//! Shared test utilities for Waypoint integration tests.
//!
//! Provides a scriptable in-memory `PlacesProvider` and helpers for building
//! sessions and routes without touching the network.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use waypoint::config::WaypointConfig;
use waypoint::provider::{
    PlacesProvider, ProviderError, RouteLeg, RouteRenderer, RouteRequest, RouteResult, Suggestion,
};
use waypoint::session::Session;

// =============================================================================
// Fake Provider
// =============================================================================

/// In-memory provider with canned suggestions, per-query latency and
/// injectable failures.
///
/// Queries without a canned answer get one suggestion labelled
/// `"<query>, Testland"`. Routes are straight lines with 10 km per leg.
#[derive(Default)]
pub struct FakeProvider {
    canned: HashMap<String, Vec<Suggestion>>,
    delays: HashMap<String, Duration>,
    failing_queries: HashSet<String>,
    route_error: Option<ProviderError>,
    prediction_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
    route_requests: Mutex<Vec<RouteRequest>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suggestions(mut self, query: &str, labels: &[&str]) -> Self {
        let suggestions = labels
            .iter()
            .enumerate()
            .map(|(i, label)| Suggestion::new(format!("{}-{}", query, i + 1), *label))
            .collect();
        self.canned.insert(query.to_string(), suggestions);
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing_queries.insert(query.to_string());
        self
    }

    pub fn with_route_error(mut self, error: ProviderError) -> Self {
        self.route_error = Some(error);
        self
    }

    pub fn prediction_calls(&self) -> usize {
        self.prediction_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn route_requests(&self) -> Vec<RouteRequest> {
        self.route_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlacesProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn place_predictions(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError> {
        self.prediction_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());

        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_queries.contains(query) {
            return Err(ProviderError::Upstream {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }

        Ok(self.canned.get(query).cloned().unwrap_or_else(|| {
            vec![Suggestion::new(
                format!("{}-1", query),
                format!("{}, Testland", query),
            )]
        }))
    }

    async fn compute_route(&self, request: &RouteRequest) -> Result<RouteResult, ProviderError> {
        self.route_requests.lock().unwrap().push(request.clone());
        if let Some(error) = &self.route_error {
            return Err(error.clone());
        }
        Ok(straight_route(request))
    }
}

/// Route visiting the request's stops in order, 10 km and 10 minutes per leg.
pub fn straight_route(request: &RouteRequest) -> RouteResult {
    let mut stops = vec![request.origin.clone()];
    stops.extend(request.waypoints.iter().cloned());
    stops.push(request.destination.clone());

    RouteResult {
        summary: "Test Road".to_string(),
        legs: stops
            .windows(2)
            .map(|pair| RouteLeg {
                start_address: pair[0].clone(),
                end_address: pair[1].clone(),
                distance_meters: 10_000,
                duration_seconds: 600,
            })
            .collect(),
        waypoint_order: (0..request.waypoints.len()).collect(),
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Start a session over the given provider with default configuration.
pub fn session_with(provider: Arc<FakeProvider>) -> Session {
    Session::new(provider, &WaypointConfig::default())
}

/// Renderer that keeps every route it is asked to show.
#[derive(Default)]
pub struct RecordingRenderer {
    pub rendered: Vec<(RouteRequest, RouteResult)>,
}

impl RouteRenderer for RecordingRenderer {
    fn render_route(&mut self, request: &RouteRequest, route: &RouteResult) {
        self.rendered.push((request.clone(), route.clone()));
    }
}

/// Advance paused time and let woken tasks run.
pub async fn advance_ms(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
