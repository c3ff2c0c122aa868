//! The environment model: stochastic risk transitions and reward shaping.

pub mod reward;
pub mod transition;

pub use reward::RewardModel;
pub use transition::TransitionModel;
