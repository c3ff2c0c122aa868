//! Reward-shaping configuration.
//!
//! The reward function is the mechanism by which the desired policy (accept
//! low risk, challenge medium risk, reject high risk) is encoded without
//! hand-written rules. A state's `riskScore` is a positive-weighted linear
//! combination of its features; the score is bucketed into three tiers by
//! two thresholds, and each (action, tier) cell holds a reward term.

use at_common::Feature;
use serde::{Deserialize, Serialize};

/// Per-feature risk-score weights.
///
/// Good binary flags (up, uv, rpIdMatch) contribute via their complement
/// `(1 - flag)`, so their absence increases the score; see
/// [`Feature::is_good_signal`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureWeights {
    pub acc_risk: f64,
    pub up_flag: f64,
    pub uv_flag: f64,
    pub has_unknown_ext: f64,
    pub rp_id_match: f64,
    pub sign_count_risk: f64,
    pub authenticator_risk: f64,
}

impl FeatureWeights {
    /// Weight for one feature.
    pub fn weight(&self, feature: Feature) -> f64 {
        match feature {
            Feature::AccRisk => self.acc_risk,
            Feature::UpFlag => self.up_flag,
            Feature::UvFlag => self.uv_flag,
            Feature::HasUnknownExt => self.has_unknown_ext,
            Feature::RpIdMatch => self.rp_id_match,
            Feature::SignCountRisk => self.sign_count_risk,
            Feature::AuthenticatorRisk => self.authenticator_risk,
        }
    }
}

/// One reward term, affine in the risk score: `base + slope * r`.
///
/// Almost every cell is a plain constant (slope 0); the offline-replay
/// preset's mid-tier Accept reward `28 - 3r` needs the slope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RewardTerm {
    pub base: f64,
    #[serde(default)]
    pub slope: f64,
}

impl RewardTerm {
    /// A constant reward.
    pub const fn flat(base: f64) -> Self {
        RewardTerm { base, slope: 0.0 }
    }

    /// Evaluate at a given risk score.
    pub fn eval(&self, risk_score: f64) -> f64 {
        self.base + self.slope * risk_score
    }
}

/// Reward terms for one action across the three risk tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierRow {
    pub low: RewardTerm,
    pub mid: RewardTerm,
    pub high: RewardTerm,
}

/// Complete reward-shaping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardShaping {
    pub weights: FeatureWeights,

    /// Scores at or below this are the low tier.
    pub low_threshold: f64,

    /// Scores above `low_threshold` and at or below this are the mid tier;
    /// everything higher is the high tier.
    pub mid_threshold: f64,

    pub accept: TierRow,
    pub mfa: TierRow,
    pub reject: TierRow,
}

impl RewardShaping {
    /// Reward terms for one action.
    pub fn row(&self, action: at_common::Action) -> &TierRow {
        match action {
            at_common::Action::Accept => &self.accept,
            at_common::Action::Mfa => &self.mfa,
            at_common::Action::Reject => &self.reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_term_ignores_score() {
        let t = RewardTerm::flat(35.0);
        assert_eq!(t.eval(0.0), 35.0);
        assert_eq!(t.eval(100.0), 35.0);
    }

    #[test]
    fn sloped_term_is_affine() {
        let t = RewardTerm {
            base: 28.0,
            slope: -3.0,
        };
        assert_eq!(t.eval(6.0), 10.0);
    }

    #[test]
    fn slope_defaults_to_zero_in_json() {
        let t: RewardTerm = serde_json::from_str(r#"{"base": 12.0}"#).unwrap();
        assert_eq!(t.slope, 0.0);
    }
}
