//! Per-field lookup tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one suggestion lookup of one field.
///
/// Tokens are minted from a per-field counter that only ever increases, so a
/// newer lookup always carries a larger token than every older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Monotonic token source owned by a single field.
#[derive(Debug, Default)]
pub struct TokenCounter {
    next: u64,
}

impl TokenCounter {
    pub fn mint(&mut self) -> RequestToken {
        self.next += 1;
        RequestToken(self.next)
    }
}

/// Whether a delivered result belongs to the field's outstanding lookup.
///
/// Arrival order is irrelevant: only an exact match with the pending token
/// is accepted. A field with no pending lookup (cleared, confirmed, or
/// already served) accepts nothing.
pub fn is_current(pending: Option<RequestToken>, delivered: RequestToken) -> bool {
    pending == Some(delivered)
}
