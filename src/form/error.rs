//! Error types for form submission.

use crate::field::{FieldId, FieldRole};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a field blocks submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Required field (origin or destination) has no text.
    Missing,
    /// Field has text that was not confirmed by selecting a suggestion.
    Unconfirmed,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::Missing => f.write_str("missing"),
            InvalidReason::Unconfirmed => f.write_str("not confirmed"),
        }
    }
}

/// One field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidField {
    pub id: FieldId,
    pub role: FieldRole,
    pub reason: InvalidReason,
}

/// Submission refused; lists every field that must be fixed first.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Select a suggested address for: {}", describe(.invalid))]
pub struct ValidationError {
    pub invalid: Vec<InvalidField>,
}

impl ValidationError {
    pub fn field_ids(&self) -> Vec<FieldId> {
        self.invalid.iter().map(|f| f.id).collect()
    }
}

fn describe(invalid: &[InvalidField]) -> String {
    invalid
        .iter()
        .map(|f| format!("{} #{} ({})", f.role, f.id, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_lists_fields() {
        let err = ValidationError {
            invalid: vec![
                InvalidField {
                    id: FieldId(0),
                    role: FieldRole::Origin,
                    reason: InvalidReason::Missing,
                },
                InvalidField {
                    id: FieldId(4),
                    role: FieldRole::Stop,
                    reason: InvalidReason::Unconfirmed,
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "Select a suggested address for: origin #0 (missing), stop #4 (not confirmed)"
        );
        assert_eq!(err.field_ids(), vec![FieldId(0), FieldId(4)]);
    }
}
