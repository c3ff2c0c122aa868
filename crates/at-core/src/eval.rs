//! Greedy-policy evaluation against labeled datasets.
//!
//! Policy extraction is core: state -> shared StateSpace index -> argmax
//! with the lowest-index tie break. The surrounding metrics are reporting.

use crate::dataset::LabeledDataset;
use crate::metrics::{self, ClassMetrics, ConfusionMatrix};
use crate::qtable::QTable;
use crate::state::StateSpace;
use at_common::{Action, Error, Result};
use serde::Serialize;

/// Evaluation report for one (table, dataset) pair.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    /// Rows evaluated.
    pub rows: usize,
    /// Greedy-policy agreement with the recorded actions.
    pub accuracy: f64,
    /// Confusion matrix indexed `[true][predicted]`.
    pub confusion: ConfusionMatrix,
    /// Per-class precision/recall/F1 in action order.
    pub per_class: [ClassMetrics; Action::COUNT],
    pub macro_f1: f64,
    /// One-vs-rest AUC per class over softmaxed Q rows; absent when a
    /// class does not appear in the truth labels.
    pub auc_ovr: [Option<f64>; Action::COUNT],
    /// Mean of the defined per-class AUCs.
    pub macro_auc: Option<f64>,
}

/// Greedy prediction for one state.
pub fn predict(table: &QTable, space: &StateSpace, state: &[u8]) -> Result<Action> {
    let index = space.index(state)?;
    Ok(table.best_action(index))
}

/// Greedy-policy accuracy only; the trainer's checkpoint hook.
pub fn policy_accuracy(
    table: &QTable,
    space: &StateSpace,
    dataset: &LabeledDataset,
) -> Result<f64> {
    let mut pairs = Vec::with_capacity(dataset.len());
    for row in &dataset.rows {
        pairs.push((row.action, predict(table, space, &row.state)?));
    }
    Ok(metrics::accuracy(&pairs))
}

/// Full evaluation with the reporting metrics block.
pub fn evaluate(table: &QTable, space: &StateSpace, dataset: &LabeledDataset) -> Result<EvalReport> {
    if table.states() != space.len() {
        return Err(Error::DimensionMismatch {
            expected: space.len(),
            actual: table.states(),
        });
    }

    let mut pairs = Vec::with_capacity(dataset.len());
    let mut probs = Vec::with_capacity(dataset.len());
    for row in &dataset.rows {
        let index = space.index(&row.state)?;
        pairs.push((row.action, table.best_action(index)));
        probs.push(metrics::softmax(table.row(index)));
    }

    let confusion = metrics::confusion_matrix(&pairs);
    let per_class = metrics::class_metrics(&confusion);

    let mut auc_ovr = [None; Action::COUNT];
    for action in Action::ALL {
        let scores: Vec<f64> = probs.iter().map(|p| p[action.index()]).collect();
        let positives: Vec<bool> = pairs.iter().map(|(truth, _)| *truth == action).collect();
        auc_ovr[action.index()] = metrics::auc_ovr(&scores, &positives);
    }
    let defined: Vec<f64> = auc_ovr.iter().flatten().copied().collect();
    let macro_auc = if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    };

    Ok(EvalReport {
        rows: dataset.len(),
        accuracy: metrics::accuracy(&pairs),
        confusion,
        per_class,
        macro_f1: metrics::macro_f1(&per_class),
        auc_ovr,
        macro_auc,
    })
}
