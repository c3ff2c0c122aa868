//! Risk feature vocabulary.
//!
//! Each discretized risk indicator observed on an authentication attempt is
//! one `Feature`. A state space is an ordered list of features; the same
//! enum drives the CSV column contract, the risk-score weights, and the
//! state-space domains, so the three can never disagree on what a dimension
//! means.

use serde::{Deserialize, Serialize};

/// A discretized risk indicator of an authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    /// Account-level risk bucket, {0,1,2}. The only dimension the
    /// transition model treats as stochastic.
    AccRisk,
    /// User-presence check passed, {0,1}.
    UpFlag,
    /// User-verification check passed, {0,1}.
    UvFlag,
    /// Unknown authenticator extension present, {0,1}.
    HasUnknownExt,
    /// Relying-party ID matched, {0,1}.
    RpIdMatch,
    /// Signature-counter anomaly bucket, {0,1,2}.
    SignCountRisk,
    /// Authenticator reputation bucket, {0,1,2}.
    AuthenticatorRisk,
}

impl Feature {
    /// Number of values this feature can take.
    pub fn cardinality(self) -> u8 {
        match self {
            Feature::AccRisk | Feature::SignCountRisk | Feature::AuthenticatorRisk => 3,
            Feature::UpFlag | Feature::UvFlag | Feature::HasUnknownExt | Feature::RpIdMatch => 2,
        }
    }

    /// Whether a raised flag is a *good* signal. Good flags contribute to
    /// the risk score via their complement `(1 - flag)`.
    pub fn is_good_signal(self) -> bool {
        matches!(self, Feature::UpFlag | Feature::UvFlag | Feature::RpIdMatch)
    }

    /// Canonical CSV column name.
    pub fn column(self) -> &'static str {
        match self {
            Feature::AccRisk => "accRisk",
            Feature::UpFlag => "upFlag",
            Feature::UvFlag => "uvFlag",
            Feature::HasUnknownExt => "hasUnknownExt",
            Feature::RpIdMatch => "rpIdMatch",
            Feature::SignCountRisk => "signCountRisk",
            Feature::AuthenticatorRisk => "authenticatorRisk",
        }
    }

    /// The 7-feature form used by online training and evaluation.
    pub const AUTH7: [Feature; 7] = [
        Feature::AccRisk,
        Feature::UpFlag,
        Feature::UvFlag,
        Feature::HasUnknownExt,
        Feature::RpIdMatch,
        Feature::SignCountRisk,
        Feature::AuthenticatorRisk,
    ];

    /// The 5-feature form used by the offline log replay.
    pub const AUTH5: [Feature; 5] = [
        Feature::AccRisk,
        Feature::UpFlag,
        Feature::UvFlag,
        Feature::HasUnknownExt,
        Feature::SignCountRisk,
    ];
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}
