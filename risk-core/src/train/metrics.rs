//! Evaluation metrics for the held-out test partition.

use std::collections::BTreeMap;

use serde::Serialize;

/// Fraction of predictions matching their target.
pub fn accuracy(predictions: &[usize], targets: &[usize]) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(targets.iter())
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / targets.len() as f64
}

/// Area under the ROC curve via the rank-sum formulation. Tied scores get
/// their average rank. Degenerate inputs (a single class, no rows) score
/// 0.5, the no-information value.
pub fn roc_auc(probabilities: &[f64], targets: &[usize]) -> f64 {
    let n = probabilities.len();
    if n == 0 {
        return 0.5;
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by(|&a, &b| {
        probabilities[a]
            .partial_cmp(&probabilities[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let n_pos = targets.iter().filter(|&&t| t == 1).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    // Walk groups of tied scores, assigning each member the group's
    // average rank (1-based).
    let mut rank_sum_pos = 0.0f64;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n
            && (probabilities[indices[j]] - probabilities[indices[i]]).abs() < f64::EPSILON
        {
            j += 1;
        }
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &index in &indices[i..j] {
            if targets[index] == 1 {
                rank_sum_pos += avg_rank;
            }
        }
        i = j;
    }

    let auc = (rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0) / (n_pos * n_neg) as f64;
    auc.clamp(0.0, 1.0)
}

/// Precision/recall/F1 for one class.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class metrics plus the support-weighted average across classes.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub per_class: BTreeMap<usize, ClassMetrics>,
    pub weighted: ClassMetrics,
    pub accuracy: f64,
}

pub fn classification_report(predictions: &[usize], targets: &[usize]) -> ClassificationReport {
    let mut classes: Vec<usize> = targets.to_vec();
    classes.extend_from_slice(predictions);
    classes.sort_unstable();
    classes.dedup();

    let total = targets.len();
    let mut per_class = BTreeMap::new();
    let mut weighted = ClassMetrics {
        precision: 0.0,
        recall: 0.0,
        f1: 0.0,
        support: total,
    };

    for class in classes {
        let tp = predictions
            .iter()
            .zip(targets.iter())
            .filter(|(p, t)| **p == class && **t == class)
            .count() as f64;
        let predicted = predictions.iter().filter(|&&p| p == class).count() as f64;
        let support = targets.iter().filter(|&&t| t == class).count();

        let precision = if predicted > 0.0 { tp / predicted } else { 0.0 };
        let recall = if support > 0 { tp / support as f64 } else { 0.0 };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        per_class.insert(
            class,
            ClassMetrics {
                precision,
                recall,
                f1,
                support,
            },
        );

        if total > 0 {
            let weight = support as f64 / total as f64;
            weighted.precision += precision * weight;
            weighted.recall += recall * weight;
            weighted.f1 += f1 * weight;
        }
    }

    ClassificationReport {
        per_class,
        weighted,
        accuracy: accuracy(predictions, targets),
    }
}

/// The test-partition summary persisted with every run record.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub roc_auc: f64,
    pub accuracy: f64,
    pub weighted_precision: f64,
    pub weighted_recall: f64,
    pub weighted_f1: f64,
}

pub fn evaluate(probabilities: &[f64], predictions: &[usize], targets: &[usize]) -> Evaluation {
    let report = classification_report(predictions, targets);
    Evaluation {
        roc_auc: roc_auc(probabilities, targets),
        accuracy: report.accuracy,
        weighted_precision: report.weighted.precision,
        weighted_recall: report.weighted.recall,
        weighted_f1: report.weighted.f1,
    }
}
