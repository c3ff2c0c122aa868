//! Semantic configuration validation.
//!
//! Configuration errors are fatal at startup. In particular, a transition
//! row that does not sum to 1 must be caught here, not discovered through
//! biased sampling.

use crate::EngineConfig;
use at_common::{schema, Action, Feature};
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Tolerance for row-stochastic checks.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("version mismatch: expected major of {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("feature list must be non-empty and start with accRisk")]
    BadFeatureList,

    #[error("duplicate feature {0} in feature list")]
    DuplicateFeature(Feature),

    #[error("transition matrix for {action} row {row} sums to {sum}, expected 1.0")]
    RowNotStochastic { action: Action, row: usize, sum: f64 },

    #[error("transition matrix for {action} has entry {value} at [{row}][{col}]")]
    BadMatrixEntry {
        action: Action,
        row: usize,
        col: usize,
        value: f64,
    },
}

/// Validate an engine configuration semantically.
pub fn validate_config(config: &EngineConfig) -> ValidationResult<()> {
    if !schema::is_compatible(&config.schema_version) {
        return Err(ValidationError::VersionMismatch {
            expected: schema::SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    validate_features(&config.features)?;
    validate_hyperparams(config)?;
    validate_shaping(config)?;
    validate_matrices(config)?;
    Ok(())
}

fn validate_features(features: &[Feature]) -> ValidationResult<()> {
    if features.first() != Some(&Feature::AccRisk) {
        return Err(ValidationError::BadFeatureList);
    }
    for (i, feature) in features.iter().enumerate() {
        if features[..i].contains(feature) {
            return Err(ValidationError::DuplicateFeature(*feature));
        }
    }
    Ok(())
}

fn validate_hyperparams(config: &EngineConfig) -> ValidationResult<()> {
    let in_range = |field: &str, value: f64, ok: bool, expect: &str| {
        if ok {
            Ok(())
        } else {
            Err(ValidationError::InvalidValue {
                field: field.to_string(),
                message: format!("{value} is not {expect}"),
            })
        }
    };

    in_range(
        "alpha",
        config.alpha,
        config.alpha > 0.0 && config.alpha <= 1.0,
        "in (0, 1]",
    )?;
    in_range(
        "gamma",
        config.gamma,
        config.gamma >= 0.0 && config.gamma < 1.0,
        "in [0, 1)",
    )?;
    in_range(
        "epsilon",
        config.epsilon,
        (0.0..=1.0).contains(&config.epsilon),
        "in [0, 1]",
    )?;
    in_range(
        "mislabel_prob",
        config.mislabel_prob,
        (0.0..=1.0).contains(&config.mislabel_prob),
        "in [0, 1]",
    )?;
    in_range(
        "penalty_lambda",
        config.penalty_lambda,
        config.penalty_lambda >= 0.0 && config.penalty_lambda.is_finite(),
        "finite and non-negative",
    )?;

    // Episode fields may all be zero for offline-only configurations, but a
    // trainable config needs a consistent trio.
    if config.episodes > 0 && (config.max_steps == 0 || config.eval_every == 0) {
        return Err(ValidationError::InvalidValue {
            field: "max_steps/eval_every".to_string(),
            message: "must be positive when episodes > 0".to_string(),
        });
    }
    Ok(())
}

fn validate_shaping(config: &EngineConfig) -> ValidationResult<()> {
    let shaping = &config.shaping;
    if !shaping.low_threshold.is_finite() || !shaping.mid_threshold.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: "thresholds".to_string(),
            message: "must be finite".to_string(),
        });
    }
    if shaping.mid_threshold < shaping.low_threshold {
        return Err(ValidationError::InvalidValue {
            field: "mid_threshold".to_string(),
            message: format!(
                "{} is below low_threshold {}",
                shaping.mid_threshold, shaping.low_threshold
            ),
        });
    }
    for feature in &config.features {
        let w = shaping.weights.weight(*feature);
        if !w.is_finite() || w < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("weights.{feature}"),
                message: format!("{w} is not finite and non-negative"),
            });
        }
    }
    Ok(())
}

fn validate_matrices(config: &EngineConfig) -> ValidationResult<()> {
    for action in Action::ALL {
        let matrix = config.transitions.matrix(action);
        for (i, row) in matrix.iter().enumerate() {
            for (j, &p) in row.iter().enumerate() {
                if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                    return Err(ValidationError::BadMatrixEntry {
                        action,
                        row: i,
                        col: j,
                        value: p,
                    });
                }
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(ValidationError::RowNotStochastic {
                    action,
                    row: i,
                    sum,
                });
            }
        }
    }
    Ok(())
}
