//! Stochastic account-risk transition model.
//!
//! Only `accRisk` (dimension 0 of every state space) evolves between steps;
//! the remaining dimensions are exogenous and carried through unchanged
//! within an episode. The next `accRisk` is drawn from the acting
//! action's row-stochastic matrix row. The RNG is an explicit dependency
//! so runs are reproducible and independent runs cannot cross-talk.

use at_common::Action;
use at_config::TransitionMatrices;
use rand::Rng;

/// Samples `accRisk` transitions from per-action matrices.
#[derive(Debug, Clone)]
pub struct TransitionModel {
    matrices: TransitionMatrices,
}

impl TransitionModel {
    /// Build from validated configuration matrices.
    pub fn new(matrices: TransitionMatrices) -> TransitionModel {
        TransitionModel { matrices }
    }

    /// The probability row for a (current accRisk, action) pair.
    pub fn row(&self, acc_risk: u8, action: Action) -> &[f64; 3] {
        self.matrices.row(acc_risk, action)
    }

    /// Sample the next `accRisk` value.
    pub fn next_acc_risk<R: Rng>(&self, acc_risk: u8, action: Action, rng: &mut R) -> u8 {
        let row = self.row(acc_risk, action);
        let draw: f64 = rng.random();
        let mut cumulative = 0.0;
        for (value, &p) in row.iter().enumerate() {
            cumulative += p;
            if draw < cumulative {
                return value as u8;
            }
        }
        // Rounding can leave the cumulative sum a hair under 1.0.
        (row.len() - 1) as u8
    }

    /// Advance a full state tuple: resample dimension 0, keep the rest.
    pub fn step<R: Rng>(&self, state: &[u8], action: Action, rng: &mut R) -> Vec<u8> {
        let mut next = state.to_vec();
        next[0] = self.next_acc_risk(state[0], action, rng);
        next
    }
}
