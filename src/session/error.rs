//! Error types for session operations.

use crate::field::FieldId;
use crate::form::ValidationError;
use crate::provider::ProviderError;
use thiserror::Error;

/// Why a route could not be produced from the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// One or more fields are missing or unconfirmed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The provider could not compute the route. The form is left as is.
    #[error("Route computation failed: {0}")]
    Route(ProviderError),
}

/// Why an address could not be resolved to a suggestion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unknown field #{0}")]
    UnknownField(FieldId),

    /// The provider found nothing for the query (or the query was blank).
    #[error("No suggestions for '{query}'")]
    NoSuggestions { query: String },

    #[error("Suggestion lookup for '{query}' failed: {source}")]
    Provider {
        query: String,
        #[source]
        source: ProviderError,
    },

    /// The delivery channel closed before the lookup completed.
    #[error("Suggestion channel closed")]
    Closed,
}
