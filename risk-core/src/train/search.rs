//! Exhaustive grid search with stratified k-fold cross-validation.

use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};

use crate::data::split::stratified_folds;
use crate::error::TrainError;
use crate::features::FeatureBatch;
use crate::model::forest::ForestParams;
use crate::model::pipeline::ModelPipeline;

/// The hyperparameter grid. Candidates are enumerated n_estimators-major,
/// which fixes the tie-break order of the search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamGrid {
    pub n_estimators: Vec<usize>,
    /// Depth limits; `0` means unbounded.
    pub max_depth: Vec<usize>,
    pub min_samples_split: Vec<usize>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            n_estimators: vec![200, 300],
            max_depth: vec![0, 10, 20],
            min_samples_split: vec![2, 5],
        }
    }
}

impl ParamGrid {
    pub fn combinations(&self) -> Vec<ForestParams> {
        let mut candidates = Vec::new();
        for &n_estimators in &self.n_estimators {
            for &depth in &self.max_depth {
                for &min_samples_split in &self.min_samples_split {
                    candidates.push(ForestParams {
                        n_estimators,
                        max_depth: if depth == 0 { None } else { Some(depth) },
                        min_samples_split,
                    });
                }
            }
        }
        candidates
    }

    pub fn is_empty(&self) -> bool {
        self.n_estimators.is_empty()
            || self.max_depth.is_empty()
            || self.min_samples_split.is_empty()
    }
}

/// Result of a grid search: the winning candidate and the pipeline refitted
/// with it on the full training partition.
#[derive(Debug)]
pub struct SearchOutcome {
    pub best_params: ForestParams,
    pub best_cv_score: f64,
    pub n_candidates: usize,
    pub pipeline: ModelPipeline,
}

/// Score every grid candidate by mean accuracy over stratified k-fold CV on
/// the given rows, then refit the best candidate on all of them.
///
/// The pipeline (preprocessor included) is refitted from scratch inside
/// every fold, so no fold's validation rows ever influence the scaler or
/// encoder it is scored against.
pub fn grid_search(
    batch: &FeatureBatch,
    targets: &Array1<usize>,
    grid: &ParamGrid,
    folds: usize,
    seed: u64,
) -> Result<SearchOutcome, TrainError> {
    if grid.is_empty() {
        return Err(TrainError::Config(
            "hyperparameter grid has an empty dimension".to_string(),
        ));
    }

    let assignment = stratified_folds(targets, folds, seed)?;
    let candidates = grid.combinations();
    let n_candidates = candidates.len();

    let mut best: Option<(ForestParams, f64)> = None;
    for (index, params) in candidates.into_iter().enumerate() {
        let mut score_sum = 0.0;
        for fold in 0..folds {
            let train_idx: Vec<usize> = (0..targets.len())
                .filter(|&i| assignment[i] != fold)
                .collect();
            let valid_idx: Vec<usize> = (0..targets.len())
                .filter(|&i| assignment[i] == fold)
                .collect();

            let pipeline = ModelPipeline::fit(
                &batch.select(&train_idx),
                &targets.select(Axis(0), &train_idx),
                &params,
                seed,
            )?;
            score_sum += pipeline.score(
                &batch.select(&valid_idx),
                &targets.select(Axis(0), &valid_idx),
            );
        }

        let mean_score = score_sum / folds as f64;
        log::debug!(
            "candidate {}/{}: {:?} -> cv score {:.4}",
            index + 1,
            n_candidates,
            params,
            mean_score
        );

        // Strictly-greater keeps the first candidate on ties, making the
        // selection deterministic.
        let improved = best.map_or(true, |(_, score)| mean_score > score);
        if improved {
            best = Some((params, mean_score));
        }
    }

    // Grid was checked non-empty above, so a winner exists.
    let (best_params, best_cv_score) = best.ok_or_else(|| {
        TrainError::Config("hyperparameter grid produced no candidates".to_string())
    })?;

    log::info!(
        "grid search done: best {:?} with cv score {:.4}",
        best_params,
        best_cv_score
    );

    let pipeline = ModelPipeline::fit(batch, targets, &best_params, seed)?;
    Ok(SearchOutcome {
        best_params,
        best_cv_score,
        n_candidates,
        pipeline,
    })
}
