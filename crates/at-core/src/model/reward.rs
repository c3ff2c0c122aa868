//! Deterministic reward shaping.
//!
//! `risk_score` collapses a state into one scalar: a positive-weighted sum
//! of its risk-indicating features, where good binary flags contribute via
//! their complement. `reward` buckets the score into three tiers and
//! evaluates the configured term for the chosen action. Pure functions of
//! state and configuration; no randomness, no side effects.

use at_common::{Action, Feature};
use at_config::{EngineConfig, RewardShaping};

/// Reward function bound to a feature ordering and shaping constants.
#[derive(Debug, Clone)]
pub struct RewardModel {
    features: Vec<Feature>,
    shaping: RewardShaping,
}

impl RewardModel {
    /// Build from a validated configuration.
    pub fn new(config: &EngineConfig) -> RewardModel {
        RewardModel {
            features: config.features.clone(),
            shaping: config.shaping.clone(),
        }
    }

    /// Scalar risk score of a state.
    ///
    /// The state must have the model's arity; this is guaranteed when it
    /// came through the shared `StateSpace`.
    pub fn risk_score(&self, state: &[u8]) -> f64 {
        debug_assert_eq!(state.len(), self.features.len());
        self.features
            .iter()
            .zip(state)
            .map(|(feature, &value)| {
                let contribution = if feature.is_good_signal() {
                    1.0 - f64::from(value)
                } else {
                    f64::from(value)
                };
                self.shaping.weights.weight(*feature) * contribution
            })
            .sum()
    }

    /// Reward for taking `action` in `state`.
    pub fn reward(&self, state: &[u8], action: Action) -> f64 {
        let r = self.risk_score(state);
        let row = self.shaping.row(action);
        let term = if r <= self.shaping.low_threshold {
            &row.low
        } else if r <= self.shaping.mid_threshold {
            &row.mid
        } else {
            &row.high
        };
        term.eval(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use at_config::PresetName;

    fn model() -> RewardModel {
        RewardModel::new(&PresetName::BalancedMfa.config())
    }

    #[test]
    fn all_good_signals_score_zero() {
        // acc=0, up=1, uv=1, unk=0, rp=1, sign=0, auth=0
        assert_eq!(model().risk_score(&[0, 1, 1, 0, 1, 0, 0]), 0.0);
    }

    #[test]
    fn all_bad_signals_score_the_weight_sum() {
        // acc=2, up=0, uv=0, unk=1, rp=0, sign=2, auth=2
        // 4*2 + 0.3 + 0.3 + 2 + 2 + 2.5*2 + 3*2 = 23.6
        let score = model().risk_score(&[2, 0, 0, 1, 0, 2, 2]);
        assert!((score - 23.6).abs() < 1e-12);
    }

    #[test]
    fn tiers_select_the_configured_terms() {
        let m = model();
        let low_state = [0, 1, 1, 0, 1, 0, 0]; // r = 0
        let high_state = [2, 0, 0, 1, 0, 2, 2]; // r = 23.6
        assert_eq!(m.reward(&low_state, Action::Accept), 35.0);
        assert_eq!(m.reward(&low_state, Action::Reject), -40.0);
        assert_eq!(m.reward(&high_state, Action::Accept), -45.0);
        assert_eq!(m.reward(&high_state, Action::Reject), 40.0);
    }

    #[test]
    fn accept_reward_is_non_increasing_and_reject_non_decreasing() {
        let m = model();
        // One state per tier: r = 0, r = 8 (acc=2: 8.0), r = 23.6.
        let states: [&[u8]; 3] = [
            &[0, 1, 1, 0, 1, 0, 0],
            &[2, 1, 1, 0, 1, 0, 0],
            &[2, 0, 0, 1, 0, 2, 2],
        ];
        let accept: Vec<f64> = states.iter().map(|s| m.reward(s, Action::Accept)).collect();
        let reject: Vec<f64> = states.iter().map(|s| m.reward(s, Action::Reject)).collect();
        assert!(accept[0] >= accept[1] && accept[1] >= accept[2]);
        assert!(reject[0] <= reject[1] && reject[1] <= reject[2]);
    }

    #[test]
    fn mid_tier_boundary_is_inclusive() {
        let m = model();
        // acc=2 with everything else good: r = 8.0, within (5, 9].
        let state = [2, 1, 1, 0, 1, 0, 0];
        assert_eq!(m.reward(&state, Action::Mfa), 55.0);
    }

    #[test]
    fn offline_preset_evaluates_sloped_mid_tier() {
        let m = RewardModel::new(&PresetName::Offline5d.config());
        // acc=1, up=1, uv=1, unk=0, sign=0 -> r = 5.0, mid tier, 28 - 15.
        let state = [1, 1, 1, 0, 0];
        assert_eq!(m.reward(&state, Action::Accept), 13.0);
    }

    #[test]
    fn reward_is_pure() {
        let m = model();
        let state = [1, 0, 1, 0, 1, 1, 2];
        let first = m.reward(&state, Action::Mfa);
        for _ in 0..10 {
            assert_eq!(m.reward(&state, Action::Mfa), first);
        }
    }
}
