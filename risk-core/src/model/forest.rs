//! Bagged ensemble of decision trees.
//!
//! Each tree is fitted on a bootstrap resample of the training rows; the
//! ensemble probability for the positive class is the fraction of trees
//! voting 1. Seeded throughout, so a fixed seed and dataset always produce
//! the same ensemble.

use linfa::prelude::*;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::TrainError;

/// Ensemble hyperparameters, the grid-search axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// `None` = unbounded depth.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestClassifier {
    params: ForestParams,
    n_features: usize,
    trees: Vec<DecisionTree<f64, usize>>,
}

impl ForestClassifier {
    pub fn fit(
        x: &Array2<f64>,
        y: &Array1<usize>,
        params: &ForestParams,
        seed: u64,
    ) -> Result<Self, TrainError> {
        let n_rows = x.nrows();
        let mut trees = Vec::with_capacity(params.n_estimators);

        for tree_index in 0..params.n_estimators {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(tree_index as u64));
            let sample: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();

            let dataset = Dataset::new(x.select(Axis(0), &sample), y.select(Axis(0), &sample));
            let tree = DecisionTree::params()
                .split_quality(SplitQuality::Gini)
                .max_depth(params.max_depth)
                .min_weight_split(params.min_samples_split as f32)
                .fit(&dataset)
                .map_err(|e| TrainError::Estimator(e.to_string()))?;
            trees.push(tree);
        }

        Ok(Self {
            params: *params,
            n_features: x.ncols(),
            trees,
        })
    }

    /// Probability of the positive class per row: the fraction of trees
    /// voting 1.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array1<f64> {
        let n = x.nrows();
        if self.trees.is_empty() {
            return Array1::zeros(n);
        }

        let mut votes = vec![0.0f64; n];
        for tree in &self.trees {
            let predictions = tree.predict(x);
            for (vote, prediction) in votes.iter_mut().zip(predictions.iter()) {
                if *prediction == 1 {
                    *vote += 1.0;
                }
            }
        }

        let total = self.trees.len() as f64;
        Array1::from_vec(votes.into_iter().map(|v| v / total).collect())
    }

    /// Hard labels by ensemble majority vote.
    pub fn predict(&self, x: &Array2<f64>) -> Array1<usize> {
        self.predict_proba(x).mapv(|p| usize::from(p >= 0.5))
    }

    /// Mean impurity-decrease importance per input column, normalized to
    /// sum to 1. `None` when the ensemble cannot report importances (no
    /// trees, or no split ever reduced impurity).
    pub fn feature_importances(&self) -> Option<Vec<f64>> {
        if self.trees.is_empty() {
            return None;
        }

        let mut totals = vec![0.0f64; self.n_features];
        for tree in &self.trees {
            let importance = tree.feature_importance();
            if importance.len() != self.n_features {
                return None;
            }
            for (total, value) in totals.iter_mut().zip(importance.iter()) {
                *total += value;
            }
        }

        let sum: f64 = totals.iter().sum();
        if sum <= 0.0 {
            return None;
        }
        Some(totals.into_iter().map(|v| v / sum).collect())
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
