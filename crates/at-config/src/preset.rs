//! Configuration presets for the tuned hyperparameter sets.
//!
//! The original deployment was trained and corrected with a small family of
//! runs that share one algorithm and differ only in constants. Each tuned
//! set is a preset here:
//! - BalancedMfa: 7-feature online training shaped so MFA wins mid risk
//! - FavorAccept: 7-feature online training shaped to favor Accept
//! - Offline5d: 5-feature offline log replay with its own shaping

use crate::shaping::{FeatureWeights, RewardShaping, RewardTerm, TierRow};
use crate::EngineConfig;
use at_common::Feature;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetName {
    /// Balanced shaping; MFA dominates the mid-risk tier. Default.
    BalancedMfa,
    /// Accept-leaning shaping with a heavier Reject penalty at low risk.
    FavorAccept,
    /// 5-feature offline replay constants.
    Offline5d,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] = &[
        PresetName::BalancedMfa,
        PresetName::FavorAccept,
        PresetName::Offline5d,
    ];

    /// Preset name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::BalancedMfa => "balanced-mfa",
            PresetName::FavorAccept => "favor-accept",
            PresetName::Offline5d => "offline-5d",
        }
    }

    /// Parse a preset name.
    pub fn parse(s: &str) -> Option<PresetName> {
        match s.to_lowercase().as_str() {
            "balanced-mfa" | "balanced" | "default" => Some(PresetName::BalancedMfa),
            "favor-accept" | "accept" => Some(PresetName::FavorAccept),
            "offline-5d" | "offline" => Some(PresetName::Offline5d),
            _ => None,
        }
    }

    /// One-line description for `--help` and `check` output.
    pub fn description(&self) -> &'static str {
        match self {
            PresetName::BalancedMfa => {
                "7-feature online training; MFA strongly rewarded at mid risk"
            }
            PresetName::FavorAccept => {
                "7-feature online training; Accept rewarded through mid risk"
            }
            PresetName::Offline5d => "5-feature offline log replay constants",
        }
    }

    /// Materialize the preset's configuration.
    pub fn config(&self) -> EngineConfig {
        match self {
            PresetName::BalancedMfa => balanced_mfa(),
            PresetName::FavorAccept => favor_accept(),
            PresetName::Offline5d => offline_5d(),
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| format!("unknown preset: {s}"))
    }
}

fn balanced_mfa() -> EngineConfig {
    let shaping = RewardShaping {
        weights: FeatureWeights {
            acc_risk: 4.0,
            up_flag: 0.3,
            uv_flag: 0.3,
            has_unknown_ext: 2.0,
            rp_id_match: 2.0,
            sign_count_risk: 2.5,
            authenticator_risk: 3.0,
        },
        low_threshold: 5.0,
        mid_threshold: 9.0,
        accept: TierRow {
            low: RewardTerm::flat(35.0),
            mid: RewardTerm::flat(-12.0),
            high: RewardTerm::flat(-45.0),
        },
        mfa: TierRow {
            low: RewardTerm::flat(-10.0),
            mid: RewardTerm::flat(55.0),
            high: RewardTerm::flat(12.0),
        },
        reject: TierRow {
            low: RewardTerm::flat(-40.0),
            mid: RewardTerm::flat(0.0),
            high: RewardTerm::flat(40.0),
        },
    };
    EngineConfig::with_parts(
        Feature::AUTH7.to_vec(),
        0.3,    // alpha
        0.9,    // gamma
        3.0,    // penalty_lambda
        0.3,    // epsilon
        10_000, // episodes
        40,     // max_steps
        300,    // eval_every
        shaping,
    )
}

fn favor_accept() -> EngineConfig {
    let shaping = RewardShaping {
        weights: FeatureWeights {
            acc_risk: 4.0,
            up_flag: 0.3,
            uv_flag: 0.3,
            has_unknown_ext: 2.0,
            rp_id_match: 1.2,
            sign_count_risk: 2.5,
            authenticator_risk: 2.7,
        },
        low_threshold: 5.0,
        mid_threshold: 9.0,
        accept: TierRow {
            low: RewardTerm::flat(45.0),
            mid: RewardTerm::flat(35.0),
            high: RewardTerm::flat(-50.0),
        },
        mfa: TierRow {
            low: RewardTerm::flat(20.0),
            mid: RewardTerm::flat(18.0),
            high: RewardTerm::flat(12.0),
        },
        reject: TierRow {
            low: RewardTerm::flat(-80.0),
            mid: RewardTerm::flat(-40.0),
            high: RewardTerm::flat(20.0),
        },
    };
    EngineConfig::with_parts(
        Feature::AUTH7.to_vec(),
        0.3,
        0.9,
        3.0,
        0.2,
        15_000,
        75,
        300,
        shaping,
    )
}

fn offline_5d() -> EngineConfig {
    let shaping = RewardShaping {
        weights: FeatureWeights {
            acc_risk: 5.0,
            up_flag: 0.2,
            uv_flag: 0.4,
            has_unknown_ext: 2.5,
            rp_id_match: 0.0,
            sign_count_risk: 3.0,
            authenticator_risk: 0.0,
        },
        low_threshold: 4.0,
        mid_threshold: 8.0,
        accept: TierRow {
            low: RewardTerm::flat(80.0),
            mid: RewardTerm {
                base: 28.0,
                slope: -3.0,
            },
            high: RewardTerm::flat(-18.0),
        },
        mfa: TierRow {
            low: RewardTerm::flat(-4.0),
            mid: RewardTerm::flat(10.0),
            high: RewardTerm::flat(8.0),
        },
        reject: TierRow {
            low: RewardTerm::flat(-45.0),
            mid: RewardTerm::flat(-6.0),
            high: RewardTerm::flat(22.0),
        },
    };
    // Episode fields are zero: this preset only drives the offline replay.
    let mut config = EngineConfig::with_parts(
        Feature::AUTH5.to_vec(),
        0.2,
        0.9,
        24.0,
        0.0,
        0,
        0,
        0,
        shaping,
    );
    config.mislabel_prob = 0.0;
    config.warm_start_passes = 0;
    config
}
