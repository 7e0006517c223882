//! Request and response types exchanged with a places provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-assigned identifier of a place prediction (e.g. a Google `place_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionId(pub String);

impl SuggestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SuggestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single address completion returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Unique identifier from the provider.
    pub id: SuggestionId,

    /// Display text; becomes the field value when selected.
    pub label: String,
}

impl Suggestion {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: SuggestionId::new(id),
            label: label.into(),
        }
    }
}

/// Route request built from a fully confirmed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    /// Intermediate stops in submission order.
    pub waypoints: Vec<String>,
    /// Let the provider reorder waypoints for a shorter route.
    pub optimize: bool,
}

/// One leg of a computed route, between two consecutive stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub start_address: String,
    pub end_address: String,
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

/// Route computed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Provider route summary (usually the main road), may be empty.
    pub summary: String,

    pub legs: Vec<RouteLeg>,

    /// Visiting order of the request's waypoints, as indices into
    /// `RouteRequest::waypoints`. Identity order when not optimized.
    pub waypoint_order: Vec<usize>,
}

impl RouteResult {
    pub fn total_distance_meters(&self) -> u64 {
        self.legs.iter().map(|leg| leg.distance_meters).sum()
    }

    pub fn total_duration_seconds(&self) -> u64 {
        self.legs.iter().map(|leg| leg.duration_seconds).sum()
    }

    /// Total distance in kilometres.
    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_meters() as f64 / 1000.0
    }
}
