//! Mapping provider abstraction.
//!
//! This module provides the `PlacesProvider` trait that hides a hosted mapping
//! service (autocomplete predictions and driving directions) behind a narrow
//! contract, plus the `RouteRenderer` seam used to present computed routes.

use async_trait::async_trait;

pub mod error;
pub mod factory;
pub mod google;
pub mod ors;
pub mod types;

// Re-export key types for convenience
pub use error::ProviderError;
pub use types::{RouteLeg, RouteRequest, RouteResult, Suggestion, SuggestionId};

/// Unified interface for hosted places/directions services.
///
/// A single instance is constructed when a session starts and shared by every
/// address field as `Arc<dyn PlacesProvider>`. Implementations must not keep
/// per-field state: concurrent lookups from different fields are independent.
///
/// # Cancellation Safety
///
/// Dropping a returned future aborts the in-flight HTTP request.
#[async_trait]
pub trait PlacesProvider: Send + Sync + 'static {
    /// Short provider name for logging (e.g. "google").
    fn name(&self) -> &str;

    /// Fetch address completions for a non-empty query.
    ///
    /// # Returns
    ///
    /// - `Ok(vec![])` when the provider found nothing
    /// - `Err(ProviderError::Network)` / `Err(ProviderError::Timeout)` on transport failures
    /// - `Err(ProviderError::Status)` when the provider rejected the query
    async fn place_predictions(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError>;

    /// Compute a driving route through the request's stops.
    async fn compute_route(&self, request: &RouteRequest) -> Result<RouteResult, ProviderError>;
}

/// Presents a computed route to the user.
pub trait RouteRenderer: Send {
    fn render_route(&mut self, request: &RouteRequest, route: &RouteResult);
}
