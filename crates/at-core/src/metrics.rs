//! Classification metrics for evaluation reports.
//!
//! Reporting glue over the greedy policy's predictions: accuracy,
//! per-class precision/recall/F1, confusion matrix, and one-vs-rest AUC
//! computed with the Mann-Whitney rank statistic over softmaxed Q rows.

use at_common::Action;
use serde::Serialize;

/// Per-class precision/recall/F1.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Confusion matrix indexed `[true_action][predicted_action]`.
pub type ConfusionMatrix = [[u64; Action::COUNT]; Action::COUNT];

/// Build the confusion matrix from (truth, prediction) pairs.
pub fn confusion_matrix(pairs: &[(Action, Action)]) -> ConfusionMatrix {
    let mut matrix = [[0u64; Action::COUNT]; Action::COUNT];
    for (truth, predicted) in pairs {
        matrix[truth.index()][predicted.index()] += 1;
    }
    matrix
}

/// Fraction of exact agreements.
pub fn accuracy(pairs: &[(Action, Action)]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let hits = pairs.iter().filter(|(t, p)| t == p).count();
    hits as f64 / pairs.len() as f64
}

/// Per-class precision/recall/F1 from a confusion matrix. Degenerate
/// denominators yield 0, matching the evaluation convention.
pub fn class_metrics(matrix: &ConfusionMatrix) -> [ClassMetrics; Action::COUNT] {
    let mut out = [ClassMetrics {
        precision: 0.0,
        recall: 0.0,
        f1: 0.0,
    }; Action::COUNT];

    for class in 0..Action::COUNT {
        let tp = matrix[class][class];
        let predicted: u64 = (0..Action::COUNT).map(|t| matrix[t][class]).sum();
        let actual: u64 = matrix[class].iter().sum();

        let precision = ratio(tp, predicted);
        let recall = ratio(tp, actual);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        out[class] = ClassMetrics {
            precision,
            recall,
            f1,
        };
    }
    out
}

/// Unweighted mean F1 across classes.
pub fn macro_f1(per_class: &[ClassMetrics; Action::COUNT]) -> f64 {
    per_class.iter().map(|m| m.f1).sum::<f64>() / Action::COUNT as f64
}

/// Softmax a Q row into a probability-shaped score vector.
pub fn softmax(row: &[f64; Action::COUNT]) -> [f64; Action::COUNT] {
    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut exp = [0.0; Action::COUNT];
    let mut sum = 0.0;
    for (out, &q) in exp.iter_mut().zip(row) {
        *out = (q - max).exp();
        sum += *out;
    }
    for out in &mut exp {
        *out /= sum;
    }
    exp
}

/// One-vs-rest ROC AUC via the Mann-Whitney rank statistic with average
/// ranks for ties. `None` when either class is absent from the truth.
pub fn auc_ovr(scores: &[f64], positives: &[bool]) -> Option<f64> {
    debug_assert_eq!(scores.len(), positives.len());
    let n_pos = positives.iter().filter(|&&p| p).count();
    let n_neg = positives.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Average ranks across tied scores, 1-based.
    let mut ranks = vec![0.0f64; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let rank = (i + 1 + j + 1) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }

    let pos_rank_sum: f64 = positives
        .iter()
        .zip(&ranks)
        .filter(|(&p, _)| p)
        .map(|(_, &r)| r)
        .sum();
    let u = pos_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos as f64 * n_neg as f64))
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
