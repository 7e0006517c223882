//! Address field state machine.
//!
//! Each address slot of the form (origin, destination, or one stop) is an
//! `AddressField` moving between three states:
//!
//! ```text
//!            edit(text)                 select(suggestion)
//!   Empty ───────────────▶ Editing ─────────────────────────▶ Confirmed
//!     ▲                     │  ▲ deliver(token, list)             │
//!     │   edit(blank)/clear │  └──────────┘                       │
//!     └─────────────────────┴────────────── edit(text) ◀──────────┘
//! ```
//!
//! The field never talks to timers or the provider itself. `edit` returns the
//! lookup the caller should debounce, and `deliver` decides whether a result
//! still belongs to the field by comparing request tokens.

pub mod token;

pub use token::{is_current, RequestToken, TokenCounter};

use crate::provider::{Suggestion, SuggestionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a field within a form. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u64);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(FieldId)
    }
}

/// Which slot of the route a field fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Origin,
    Destination,
    Stop,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRole::Origin => f.write_str("origin"),
            FieldRole::Destination => f.write_str("destination"),
            FieldRole::Stop => f.write_str("stop"),
        }
    }
}

/// Lifecycle state of an address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    /// No address text.
    #[default]
    Empty,
    /// Text typed but not confirmed; suggestions may be shown.
    Editing,
    /// Text equals a suggestion the user selected.
    Confirmed,
}

/// A suggestion lookup requested by an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub token: RequestToken,
    pub query: String,
}

/// What the caller must do after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Debounce and then issue this lookup.
    Lookup(LookupRequest),
    /// The field is now empty; cancel any pending lookup work.
    Cleared,
}

/// One address slot and its autocomplete state.
#[derive(Debug)]
pub struct AddressField {
    id: FieldId,
    role: FieldRole,
    raw_value: String,
    confirmed_value: Option<String>,
    state: FieldState,
    suggestions: Vec<Suggestion>,
    pending_token: Option<RequestToken>,
    tokens: TokenCounter,
}

impl AddressField {
    pub fn new(id: FieldId, role: FieldRole) -> Self {
        Self {
            id,
            role,
            raw_value: String::new(),
            confirmed_value: None,
            state: FieldState::Empty,
            suggestions: Vec::new(),
            pending_token: None,
            tokens: TokenCounter::default(),
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn role(&self) -> FieldRole {
        self.role
    }

    /// Current text as typed (or as selected).
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    pub fn confirmed_value(&self) -> Option<&str> {
        self.confirmed_value.as_deref()
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn pending_token(&self) -> Option<RequestToken> {
        self.pending_token
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == FieldState::Confirmed
    }

    /// True when the field holds no address text (treated as "not provided").
    pub fn is_blank(&self) -> bool {
        self.state == FieldState::Empty
    }

    /// Whether a lookup was issued and its result has not been applied yet.
    pub fn is_awaiting_suggestions(&self) -> bool {
        self.pending_token.is_some()
    }

    /// Apply a direct edit.
    ///
    /// Any edit drops the confirmation. Text that is empty after trimming
    /// moves the field to `Empty`; anything else moves it to `Editing` and
    /// mints a fresh token for the lookup the caller should debounce.
    pub fn edit(&mut self, text: &str) -> EditOutcome {
        self.raw_value = text.to_string();
        self.confirmed_value = None;

        if text.trim().is_empty() {
            self.state = FieldState::Empty;
            self.suggestions.clear();
            self.pending_token = None;
            return EditOutcome::Cleared;
        }

        self.state = FieldState::Editing;
        let token = self.tokens.mint();
        self.pending_token = Some(token);

        EditOutcome::Lookup(LookupRequest {
            token,
            query: text.to_string(),
        })
    }

    /// Apply delivered suggestions if `token` is the pending one.
    ///
    /// Returns whether the list was applied. A stale token leaves the field
    /// untouched.
    pub fn deliver(&mut self, token: RequestToken, suggestions: Vec<Suggestion>) -> bool {
        if self.state != FieldState::Editing || !is_current(self.pending_token, token) {
            return false;
        }

        self.suggestions = suggestions;
        self.pending_token = None;
        true
    }

    /// Confirm the field with a selected suggestion.
    pub fn select(&mut self, suggestion: &Suggestion) {
        self.raw_value = suggestion.label.clone();
        self.confirmed_value = Some(suggestion.label.clone());
        self.state = FieldState::Confirmed;
        self.suggestions.clear();
        self.pending_token = None;

        debug_assert!(self.suggestions.is_empty());
        debug_assert_eq!(self.confirmed_value.as_deref(), Some(self.raw_value.as_str()));
    }

    /// Look up one of the currently displayed suggestions by id.
    pub fn find_suggestion(&self, id: &SuggestionId) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| &s.id == id)
    }

    /// Reset to `Empty`, forgetting any pending lookup.
    pub fn clear(&mut self) {
        self.raw_value.clear();
        self.confirmed_value = None;
        self.state = FieldState::Empty;
        self.suggestions.clear();
        self.pending_token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> AddressField {
        AddressField::new(FieldId(7), FieldRole::Stop)
    }

    fn lookup(outcome: EditOutcome) -> LookupRequest {
        match outcome {
            EditOutcome::Lookup(request) => request,
            EditOutcome::Cleared => panic!("Expected a lookup"),
        }
    }

    #[test]
    fn test_new_field_is_empty() {
        let field = field();
        assert_eq!(field.state(), FieldState::Empty);
        assert!(field.is_blank());
        assert!(!field.is_confirmed());
        assert!(field.suggestions().is_empty());
        assert_eq!(field.pending_token(), None);
    }

    #[test]
    fn test_edit_moves_to_editing_and_mints_token() {
        let mut field = field();
        let request = lookup(field.edit("Par"));

        assert_eq!(field.state(), FieldState::Editing);
        assert_eq!(field.raw_value(), "Par");
        assert_eq!(request.query, "Par");
        assert_eq!(field.pending_token(), Some(request.token));
    }

    #[test]
    fn test_each_edit_mints_a_newer_token() {
        let mut field = field();
        let first = lookup(field.edit("P")).token;
        let second = lookup(field.edit("Pa")).token;

        assert!(second > first);
        assert_eq!(field.pending_token(), Some(second));
    }

    #[test]
    fn test_deliver_current_token_applies() {
        let mut field = field();
        let request = lookup(field.edit("Par"));

        let applied = field.deliver(request.token, vec![Suggestion::new("p1", "Paris")]);

        assert!(applied);
        assert_eq!(field.suggestions().len(), 1);
        assert!(!field.is_awaiting_suggestions());
        assert_eq!(field.state(), FieldState::Editing);
    }

    #[test]
    fn test_deliver_stale_token_is_ignored() {
        let mut field = field();
        let old = lookup(field.edit("Pa")).token;
        let new = lookup(field.edit("Par")).token;

        assert!(field.deliver(new, vec![Suggestion::new("p1", "Paris")]));
        assert!(!field.deliver(old, vec![Suggestion::new("p9", "Panama")]));

        assert_eq!(field.suggestions(), &[Suggestion::new("p1", "Paris")]);
    }

    #[test]
    fn test_stale_delivery_before_newer_result_leaves_list_unset() {
        let mut field = field();
        let old = lookup(field.edit("Pa")).token;
        let _new = lookup(field.edit("Par")).token;

        assert!(!field.deliver(old, vec![Suggestion::new("p9", "Panama")]));
        assert!(field.suggestions().is_empty());
        assert!(field.is_awaiting_suggestions());
    }

    #[test]
    fn test_select_confirms_and_clears_suggestions() {
        let mut field = field();
        let request = lookup(field.edit("Par"));
        field.deliver(
            request.token,
            vec![Suggestion::new("p1", "Paris, France"), Suggestion::new("p2", "Parma")],
        );

        field.select(&Suggestion::new("p1", "Paris, France"));

        assert!(field.is_confirmed());
        assert!(field.suggestions().is_empty());
        assert_eq!(field.raw_value(), "Paris, France");
        assert_eq!(field.confirmed_value(), Some("Paris, France"));
        assert_eq!(field.pending_token(), None);
    }

    #[test]
    fn test_delivery_after_select_is_ignored() {
        let mut field = field();
        let request = lookup(field.edit("Par"));
        field.select(&Suggestion::new("p1", "Paris, France"));

        assert!(!field.deliver(request.token, vec![Suggestion::new("p2", "Parma")]));
        assert!(field.suggestions().is_empty());
        assert!(field.is_confirmed());
    }

    #[test]
    fn test_edit_after_confirm_unconfirms() {
        let mut field = field();
        field.edit("Par");
        field.select(&Suggestion::new("p1", "Paris, France"));

        field.edit("Paris, Texas");

        assert_eq!(field.state(), FieldState::Editing);
        assert!(!field.is_confirmed());
        assert_eq!(field.confirmed_value(), None);
    }

    #[test]
    fn test_blank_edit_empties_field() {
        let mut field = field();
        let request = lookup(field.edit("Par"));

        assert_eq!(field.edit("   "), EditOutcome::Cleared);
        assert!(field.is_blank());
        assert!(!field.deliver(request.token, vec![Suggestion::new("p1", "Paris")]));
        assert!(field.suggestions().is_empty());
    }

    #[test]
    fn test_clear_drops_pending_lookup() {
        let mut field = field();
        let request = lookup(field.edit("Par"));

        field.clear();

        assert_eq!(field.state(), FieldState::Empty);
        assert_eq!(field.raw_value(), "");
        assert!(!field.deliver(request.token, vec![Suggestion::new("p1", "Paris")]));
    }

    #[test]
    fn test_tokens_keep_increasing_after_clear() {
        let mut field = field();
        let before = lookup(field.edit("Par")).token;
        field.clear();
        let after = lookup(field.edit("Lyo")).token;

        assert!(after > before);
    }

    #[test]
    fn test_find_suggestion_by_id() {
        let mut field = field();
        let request = lookup(field.edit("Par"));
        field.deliver(request.token, vec![Suggestion::new("p1", "Paris")]);

        assert!(field.find_suggestion(&SuggestionId::new("p1")).is_some());
        assert!(field.find_suggestion(&SuggestionId::new("zz")).is_none());
    }

    #[test]
    fn test_field_id_parse() {
        assert_eq!("3".parse::<FieldId>().unwrap(), FieldId(3));
        assert_eq!("#12".parse::<FieldId>().unwrap(), FieldId(12));
        assert!("origin".parse::<FieldId>().is_err());
    }
}
