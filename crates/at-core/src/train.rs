//! Online epsilon-greedy Q-learning over simulated episodes.
//!
//! Each episode starts from a uniformly sampled state and runs a fixed
//! number of steps against the stochastic transition model. Exploration is
//! a fixed epsilon for the whole run; there is no decay schedule. A small
//! stochastic penalty models occasional mislabeled feedback. Episodes are
//! independent; only the Q-table carries over.

use crate::dataset::LabeledDataset;
use crate::eval::policy_accuracy;
use crate::model::{RewardModel, TransitionModel};
use crate::qtable::QTable;
use crate::state::StateSpace;
use at_common::{Action, Error, Result};
use at_config::EngineConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::time::Instant;

/// One periodic checkpoint evaluation during training.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CheckpointRecord {
    pub episode: u32,
    pub accuracy: f64,
    pub elapsed_secs: f64,
}

/// Summary of one training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub episodes: u32,
    pub total_steps: u64,
    /// Steps taken per action, in action order; the run's action
    /// distribution diagnostic.
    pub action_counts: [u64; Action::COUNT],
    /// Checkpoint history (episode, accuracy, elapsed seconds).
    pub checkpoints: Vec<CheckpointRecord>,
    /// Accuracy at the end of the run, when a holdout was supplied.
    pub final_accuracy: Option<f64>,
    /// Warm-start updates applied before the online loop.
    pub warm_start_updates: u64,
}

/// Online trainer; owns the run's RNG.
pub struct Trainer {
    space: StateSpace,
    reward: RewardModel,
    transitions: TransitionModel,
    config: EngineConfig,
    rng: ChaCha8Rng,
}

impl Trainer {
    /// Build a trainer from a validated configuration. The RNG is seeded
    /// from `config.seed`; two trainers with identical configuration
    /// produce bit-identical tables.
    pub fn new(config: &EngineConfig) -> Trainer {
        Trainer {
            space: StateSpace::new(&config.features),
            reward: RewardModel::new(config),
            transitions: TransitionModel::new(config.transitions.clone()),
            config: config.clone(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// The trainer's state space (shared indexing for callers).
    pub fn space(&self) -> &StateSpace {
        &self.space
    }

    /// Pre-populate the table from historical (state, action) pairs.
    ///
    /// Each pass replays the dataset through the degenerate one-step
    /// update whose target is the immediate reward alone. Returns the
    /// number of updates applied.
    pub fn warm_start(&mut self, table: &mut QTable, dataset: &LabeledDataset) -> Result<u64> {
        self.check_table(table)?;
        let mut updates = 0u64;
        for _ in 0..self.config.warm_start_passes {
            for row in &dataset.rows {
                let index = self.space.index(&row.state)?;
                let target = self.reward.reward(&row.state, row.action);
                table.update(index, row.action, target, self.config.alpha);
                updates += 1;
            }
        }
        Ok(updates)
    }

    /// Run the online training loop, mutating `table` in place.
    ///
    /// When `holdout` is supplied, greedy-policy accuracy is recorded
    /// every `eval_every` episodes; the history is reporting only and
    /// never feeds back into the run.
    pub fn run(
        &mut self,
        table: &mut QTable,
        holdout: Option<&LabeledDataset>,
    ) -> Result<TrainReport> {
        if self.config.episodes == 0 || self.config.max_steps == 0 {
            return Err(Error::Config(
                "training requires positive episodes and max_steps".to_string(),
            ));
        }
        self.check_table(table)?;

        let started = Instant::now();
        let mut action_counts = [0u64; Action::COUNT];
        let mut checkpoints = Vec::new();
        let mut total_steps = 0u64;

        for episode in 0..self.config.episodes {
            let mut state = self
                .space
                .state(self.rng.random_range(0..self.space.len()))?;

            for _ in 0..self.config.max_steps {
                let index = self.space.index(&state)?;
                let action = if self.rng.random::<f64>() < self.config.epsilon {
                    Action::ALL[self.rng.random_range(0..Action::COUNT)]
                } else {
                    table.best_action(index)
                };
                action_counts[action.index()] += 1;
                total_steps += 1;

                let reward = self.reward.reward(&state, action);
                let adjusted = if self.rng.random::<f64>() < self.config.mislabel_prob {
                    reward - self.config.penalty_lambda
                } else {
                    reward
                };

                let next = self.transitions.step(&state, action, &mut self.rng);
                let next_index = self.space.index(&next)?;
                let target = adjusted + self.config.gamma * table.max_value(next_index);
                table.update(index, action, target, self.config.alpha);
                state = next;
            }

            if self.config.eval_every > 0 && (episode + 1) % self.config.eval_every == 0 {
                if let Some(dataset) = holdout {
                    let accuracy = policy_accuracy(table, &self.space, dataset)?;
                    let record = CheckpointRecord {
                        episode: episode + 1,
                        accuracy,
                        elapsed_secs: started.elapsed().as_secs_f64(),
                    };
                    tracing::info!(
                        episode = record.episode,
                        accuracy = record.accuracy,
                        "checkpoint evaluation"
                    );
                    checkpoints.push(record);
                }
            }
        }

        let final_accuracy = match holdout {
            Some(dataset) => Some(policy_accuracy(table, &self.space, dataset)?),
            None => None,
        };

        Ok(TrainReport {
            episodes: self.config.episodes,
            total_steps,
            action_counts,
            checkpoints,
            final_accuracy,
            warm_start_updates: 0,
        })
    }

    fn check_table(&self, table: &QTable) -> Result<()> {
        if table.states() != self.space.len() {
            return Err(Error::DimensionMismatch {
                expected: self.space.len(),
                actual: table.states(),
            });
        }
        Ok(())
    }
}
