//! Route form aggregator.
//!
//! `FormState` owns the origin, destination and stop fields, wires edits to
//! the debouncer and fetcher, applies deliveries, and turns a fully
//! confirmed form into a `RouteRequest`.

mod error;

pub use error::*;

use crate::config::FormConfig;
use crate::debounce::Debouncer;
use crate::fetcher::{Delivery, SuggestionFetcher};
use crate::field::{is_current, AddressField, EditOutcome, FieldId, FieldRole};
use crate::provider::{RouteRequest, Suggestion, SuggestionId};
use std::time::Duration;

/// Result of applying a delivery to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The suggestions replaced the field's list.
    Applied { count: usize },
    /// The field has moved on (newer edit, selection, or clear).
    Stale,
    /// The field no longer exists (removed stop).
    UnknownField,
}

/// The whole route form: origin, destination and ordered stops.
///
/// Must be driven from within a Tokio runtime because edits arm debounce
/// timers. Dropping the form cancels every pending timer.
#[derive(Debug)]
pub struct FormState {
    origin: AddressField,
    destination: AddressField,
    stops: Vec<AddressField>,
    next_id: u64,
    debouncer: Debouncer,
    fetcher: SuggestionFetcher,
    debounce: Duration,
    optimize_waypoints: bool,
}

impl FormState {
    pub fn new(config: &FormConfig, fetcher: SuggestionFetcher) -> Self {
        Self {
            origin: AddressField::new(FieldId(0), FieldRole::Origin),
            destination: AddressField::new(FieldId(1), FieldRole::Destination),
            stops: Vec::new(),
            next_id: 2,
            debouncer: Debouncer::new(),
            fetcher,
            debounce: config.debounce(),
            optimize_waypoints: config.optimize_waypoints,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn origin(&self) -> &AddressField {
        &self.origin
    }

    pub fn destination(&self) -> &AddressField {
        &self.destination
    }

    /// Stops in display and submission order.
    pub fn stops(&self) -> &[AddressField] {
        &self.stops
    }

    pub fn field(&self, id: FieldId) -> Option<&AddressField> {
        self.fields().find(|f| f.id() == id)
    }

    /// All fields in display order: origin, destination, then stops.
    pub fn fields(&self) -> impl Iterator<Item = &AddressField> {
        [&self.origin, &self.destination]
            .into_iter()
            .chain(self.stops.iter())
    }

    /// Display label for a field. Stop numbers follow the current position
    /// and are never used as identity.
    pub fn placeholder(&self, id: FieldId) -> Option<String> {
        if id == self.origin.id() {
            return Some("Origin".to_string());
        }
        if id == self.destination.id() {
            return Some("Destination".to_string());
        }
        self.stops
            .iter()
            .position(|s| s.id() == id)
            .map(|index| format!("Stop {}", index + 1))
    }

    pub fn optimize_waypoints(&self) -> bool {
        self.optimize_waypoints
    }

    pub fn set_optimize_waypoints(&mut self, optimize: bool) {
        self.optimize_waypoints = optimize;
    }

    /// Whether a debounced lookup is armed for the field.
    pub fn is_lookup_scheduled(&self, id: FieldId) -> bool {
        self.debouncer.is_pending(id)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Append an empty stop and return its id.
    pub fn add_stop(&mut self) -> FieldId {
        let id = FieldId(self.next_id);
        self.next_id += 1;
        self.stops.push(AddressField::new(id, FieldRole::Stop));
        tracing::debug!(field_id = %id, stops = self.stops.len(), "Stop added");
        id
    }

    /// Remove a stop. Unknown ids, origin and destination are ignored.
    ///
    /// Returns whether a stop was removed.
    pub fn remove_stop(&mut self, id: FieldId) -> bool {
        let Some(index) = self.stops.iter().position(|s| s.id() == id) else {
            return false;
        };
        self.debouncer.cancel(id);
        self.stops.remove(index);
        tracing::debug!(field_id = %id, stops = self.stops.len(), "Stop removed");
        true
    }

    /// Route a direct edit to a field and debounce its lookup.
    pub fn update_field(&mut self, id: FieldId, text: &str) {
        let Some(field) = self.field_mut(id) else {
            return;
        };

        match field.edit(text) {
            EditOutcome::Lookup(request) => {
                tracing::debug!(field_id = %id, token = %request.token, "Field edited");
                let fetcher = self.fetcher.clone();
                self.debouncer.schedule(id, self.debounce, move || {
                    fetcher.fetch(id, request.query, request.token);
                });
            }
            EditOutcome::Cleared => {
                tracing::debug!(field_id = %id, "Field emptied by edit");
                self.debouncer.cancel(id);
            }
        }
    }

    /// Confirm a field with a suggestion.
    pub fn select_suggestion(&mut self, id: FieldId, suggestion: &Suggestion) {
        let Some(field) = self.field_mut(id) else {
            return;
        };
        field.select(suggestion);
        self.debouncer.cancel(id);
        tracing::debug!(field_id = %id, suggestion_id = %suggestion.id, "Suggestion selected");
    }

    /// Confirm a field with one of its displayed suggestions.
    ///
    /// Returns the selected suggestion, or `None` when the field or the
    /// suggestion id is unknown.
    pub fn select_suggestion_by_id(
        &mut self,
        id: FieldId,
        suggestion_id: &SuggestionId,
    ) -> Option<Suggestion> {
        let suggestion = self.field(id)?.find_suggestion(suggestion_id)?.clone();
        self.select_suggestion(id, &suggestion);
        Some(suggestion)
    }

    /// Reset a field to empty, cancelling its timer and pending lookup.
    pub fn clear_field(&mut self, id: FieldId) {
        let Some(field) = self.field_mut(id) else {
            return;
        };
        field.clear();
        self.debouncer.cancel(id);
        tracing::debug!(field_id = %id, "Field cleared");
    }

    /// Apply a lookup outcome if it still belongs to its field.
    ///
    /// Provider failures become an empty list and a warning; they never
    /// reach the user as errors.
    pub fn apply_delivery(&mut self, delivery: Delivery) -> DeliveryOutcome {
        let Delivery {
            field_id,
            token,
            outcome,
        } = delivery;

        let Some(field) = self.field_mut(field_id) else {
            tracing::trace!(field_id = %field_id, token = %token, "Delivery for unknown field");
            return DeliveryOutcome::UnknownField;
        };

        if !is_current(field.pending_token(), token) {
            tracing::trace!(
                field_id = %field_id,
                token = %token,
                pending = ?field.pending_token(),
                "Discarding stale suggestions"
            );
            return DeliveryOutcome::Stale;
        }

        let suggestions = outcome.unwrap_or_else(|error| {
            tracing::warn!(
                field_id = %field_id,
                error = %error,
                "Suggestion lookup failed, showing no suggestions"
            );
            Vec::new()
        });

        let count = suggestions.len();
        if field.deliver(token, suggestions) {
            DeliveryOutcome::Applied { count }
        } else {
            DeliveryOutcome::Stale
        }
    }

    /// True when origin and destination are confirmed and every stop is
    /// either confirmed or blank.
    pub fn can_submit(&self) -> bool {
        self.origin.is_confirmed()
            && self.destination.is_confirmed()
            && self.stops.iter().all(|s| s.is_confirmed() || s.is_blank())
    }

    /// Build the route request, or report every field blocking it.
    pub fn submit(&self) -> Result<RouteRequest, ValidationError> {
        let mut invalid = Vec::new();

        for field in [&self.origin, &self.destination] {
            if let Some(reason) = required_field_problem(field) {
                invalid.push(InvalidField {
                    id: field.id(),
                    role: field.role(),
                    reason,
                });
            }
        }

        for stop in &self.stops {
            if !stop.is_blank() && !stop.is_confirmed() {
                invalid.push(InvalidField {
                    id: stop.id(),
                    role: stop.role(),
                    reason: InvalidReason::Unconfirmed,
                });
            }
        }

        if !invalid.is_empty() {
            return Err(ValidationError { invalid });
        }

        let waypoints = self
            .stops
            .iter()
            .filter_map(|s| s.confirmed_value())
            .map(str::to_string)
            .collect();

        Ok(RouteRequest {
            origin: confirmed(&self.origin),
            destination: confirmed(&self.destination),
            waypoints,
            optimize: self.optimize_waypoints,
        })
    }

    fn field_mut(&mut self, id: FieldId) -> Option<&mut AddressField> {
        if self.origin.id() == id {
            return Some(&mut self.origin);
        }
        if self.destination.id() == id {
            return Some(&mut self.destination);
        }
        self.stops.iter_mut().find(|s| s.id() == id)
    }
}

fn required_field_problem(field: &AddressField) -> Option<InvalidReason> {
    if field.is_blank() {
        Some(InvalidReason::Missing)
    } else if !field.is_confirmed() {
        Some(InvalidReason::Unconfirmed)
    } else {
        None
    }
}

fn confirmed(field: &AddressField) -> String {
    field.confirmed_value().unwrap_or_default().to_string()
}
