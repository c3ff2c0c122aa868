//! Authentication Triage configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the engine configuration file
//! - Reward-shaping and transition-matrix configuration
//! - Named presets capturing the tuned hyperparameter sets
//! - Semantic validation

pub mod preset;
pub mod shaping;
pub mod transition;
pub mod validate;

pub use preset::PresetName;
pub use shaping::{FeatureWeights, RewardShaping, RewardTerm, TierRow};
pub use transition::TransitionMatrices;
pub use validate::{validate_config, ValidationError, ValidationResult};

use at_common::{Error, Feature, Result, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete engine configuration.
///
/// One struct covers both the online trainer and the offline log replay;
/// the tuned variants of the original deployment are exposed as presets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub schema_version: String,

    /// Ordered feature list defining the state space. The first feature
    /// must be `accRisk`; it is the only stochastic dimension.
    pub features: Vec<Feature>,

    /// Learning rate α ∈ (0, 1].
    pub alpha: f64,

    /// Discount factor γ ∈ [0, 1).
    pub gamma: f64,

    /// Penalty weight λ: subtracted on simulated mislabels (online) and
    /// scaled by misjudge severity (offline).
    pub penalty_lambda: f64,

    /// Exploration rate ε ∈ [0, 1], fixed for the whole run.
    pub epsilon: f64,

    /// Number of simulated episodes.
    pub episodes: u32,

    /// Steps per episode.
    pub max_steps: u32,

    /// Checkpoint-evaluation cadence, in episodes.
    pub eval_every: u32,

    /// Probability that a simulated step's reward is penalized as a
    /// mislabel.
    #[serde(default = "default_mislabel_prob")]
    pub mislabel_prob: f64,

    /// Passes over the warm-start dataset before online training.
    #[serde(default = "default_warm_start_passes")]
    pub warm_start_passes: u32,

    /// Seed for the run's RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,

    pub shaping: RewardShaping,

    #[serde(default)]
    pub transitions: TransitionMatrices,
}

fn default_mislabel_prob() -> f64 {
    0.02
}

fn default_warm_start_passes() -> u32 {
    5
}

fn default_seed() -> u64 {
    42
}

impl Default for EngineConfig {
    fn default() -> Self {
        PresetName::BalancedMfa.config()
    }
}

impl EngineConfig {
    /// Load a configuration file, falling back to the default preset when
    /// `path` is `None`. The result is always semantically validated.
    pub fn load(path: Option<&Path>) -> Result<EngineConfig> {
        let config = match path {
            Some(p) => {
                let content =
                    std::fs::read_to_string(p).map_err(|e| Error::io(p, e))?;
                serde_json::from_str(&content).map_err(|e| Error::json(p, e))?
            }
            None => EngineConfig::default(),
        };
        validate_config(&config).map_err(|e| Error::Config(e.to_string()))?;
        Ok(config)
    }

    /// Serialize to pretty JSON for `config show`-style output.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Number of states in this configuration's state space.
    pub fn state_count(&self) -> usize {
        self.features
            .iter()
            .map(|f| f.cardinality() as usize)
            .product()
    }

    /// Fresh schema-stamped config with the given parts; used by presets.
    pub(crate) fn with_parts(
        features: Vec<Feature>,
        alpha: f64,
        gamma: f64,
        penalty_lambda: f64,
        epsilon: f64,
        episodes: u32,
        max_steps: u32,
        eval_every: u32,
        shaping: RewardShaping,
    ) -> Self {
        EngineConfig {
            schema_version: SCHEMA_VERSION.to_string(),
            features,
            alpha,
            gamma,
            penalty_lambda,
            epsilon,
            episodes,
            max_steps,
            eval_every,
            mislabel_prob: default_mislabel_prob(),
            warm_start_passes: default_warm_start_passes(),
            seed: default_seed(),
            shaping,
            transitions: TransitionMatrices::default(),
        }
    }
}
