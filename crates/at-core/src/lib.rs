//! Authentication Triage core - Q-learning and decision engine.
//!
//! Maps an authentication attempt's discretized risk features to one of
//! three actions (Accept, Require-MFA, Reject) via a tabular value function
//! over a fully enumerable state space. The engine supports:
//! - Online epsilon-greedy training against a stochastic risk model
//! - Offline expectation-based Bellman updates from logged real outcomes
//! - Greedy policy evaluation against held-out labeled datasets

pub mod dataset;
pub mod eval;
pub mod exit_codes;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod offline;
pub mod qtable;
pub mod state;
pub mod train;

pub use dataset::{LabeledDataset, LabeledRow};
pub use eval::{evaluate, policy_accuracy, EvalReport};
pub use model::{RewardModel, TransitionModel};
pub use offline::{LogRecord, LogStore, OfflineUpdater, ReplayReport};
pub use qtable::QTable;
pub use state::StateSpace;
pub use train::{CheckpointRecord, TrainReport, Trainer};
