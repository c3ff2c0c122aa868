//! The decision action enumeration.
//!
//! Actions are represented three ways across the system:
//! - as enum variants in code,
//! - as column indices 0/1/2 in the Q-table,
//! - as case-insensitive text tokens (`ACCEPT` / `MFA` / `REJECT`) in
//!   persisted decision logs.

use serde::{Deserialize, Serialize};

/// Supported decisions for an authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Let the attempt through.
    Accept,
    /// Challenge with a second factor.
    Mfa,
    /// Deny the attempt.
    Reject,
}

impl Action {
    /// All actions in canonical (Q-table column) order.
    pub const ALL: [Action; 3] = [Action::Accept, Action::Mfa, Action::Reject];

    /// Number of actions; the Q-table column count.
    pub const COUNT: usize = 3;

    /// Q-table column index. Also the tie-break rank: lower wins.
    pub fn index(self) -> usize {
        match self {
            Action::Accept => 0,
            Action::Mfa => 1,
            Action::Reject => 2,
        }
    }

    /// Inverse of [`Action::index`].
    pub fn from_index(idx: usize) -> Option<Action> {
        Action::ALL.get(idx).copied()
    }

    /// Parse a log token case-insensitively. Surrounding whitespace is
    /// tolerated; anything else is `None` (callers warn and skip).
    pub fn from_token(token: &str) -> Option<Action> {
        match token.trim().to_ascii_uppercase().as_str() {
            "ACCEPT" => Some(Action::Accept),
            "MFA" => Some(Action::Mfa),
            "REJECT" => Some(Action::Reject),
            _ => None,
        }
    }

    /// Canonical log token.
    pub fn token(self) -> &'static str {
        match self {
            Action::Accept => "ACCEPT",
            Action::Mfa => "MFA",
            Action::Reject => "REJECT",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_index(action.index()), Some(action));
        }
        assert_eq!(Action::from_index(3), None);
    }

    #[test]
    fn token_parsing_is_case_insensitive() {
        assert_eq!(Action::from_token("accept"), Some(Action::Accept));
        assert_eq!(Action::from_token("Mfa"), Some(Action::Mfa));
        assert_eq!(Action::from_token(" REJECT "), Some(Action::Reject));
        assert_eq!(Action::from_token("allow"), None);
        assert_eq!(Action::from_token(""), None);
    }

    #[test]
    fn canonical_order_matches_indices() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
    }
}
