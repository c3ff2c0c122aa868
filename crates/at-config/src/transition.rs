//! Account-risk transition matrices.
//!
//! One 3x3 row-stochastic matrix per action describes how `accRisk` moves
//! between {0,1,2} after that action is taken. These are immutable
//! configuration, not learned. Accept's matrix is more forgiving than
//! Reject's: rejecting a legitimate user does not reduce future risk.

use at_common::Action;
use serde::{Deserialize, Serialize};

/// One row-stochastic matrix per action, indexed `[current][next]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionMatrices {
    pub accept: [[f64; 3]; 3],
    pub mfa: [[f64; 3]; 3],
    pub reject: [[f64; 3]; 3],
}

impl Default for TransitionMatrices {
    fn default() -> Self {
        TransitionMatrices {
            accept: [
                [0.70, 0.20, 0.10],
                [0.30, 0.50, 0.20],
                [0.20, 0.30, 0.50],
            ],
            mfa: [
                [0.50, 0.30, 0.20],
                [0.20, 0.50, 0.30],
                [0.20, 0.30, 0.50],
            ],
            reject: [
                [0.50, 0.30, 0.20],
                [0.20, 0.50, 0.30],
                [0.10, 0.20, 0.70],
            ],
        }
    }
}

impl TransitionMatrices {
    /// The matrix for one action.
    pub fn matrix(&self, action: Action) -> &[[f64; 3]; 3] {
        match action {
            Action::Accept => &self.accept,
            Action::Mfa => &self.mfa,
            Action::Reject => &self.reject,
        }
    }

    /// The probability row for a (current accRisk, action) pair.
    pub fn row(&self, acc_risk: u8, action: Action) -> &[f64; 3] {
        &self.matrix(action)[acc_risk as usize]
    }
}
