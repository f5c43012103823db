//! The fitted preprocessing + classifier pipeline.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::TrainError;
use crate::features::FeatureBatch;
use crate::model::forest::{ForestClassifier, ForestParams};
use crate::preprocess::Preprocessor;

/// Preprocessor and ensemble fitted together on the same rows. Fitting a
/// pipeline refits the preprocessor from scratch, which is what keeps
/// cross-validation folds free of leakage from their validation rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPipeline {
    preprocessor: Preprocessor,
    forest: ForestClassifier,
}

impl ModelPipeline {
    pub fn fit(
        batch: &FeatureBatch,
        targets: &Array1<usize>,
        params: &ForestParams,
        seed: u64,
    ) -> Result<Self, TrainError> {
        let preprocessor = Preprocessor::fit(batch);
        let matrix = preprocessor.transform(batch);
        let forest = ForestClassifier::fit(&matrix, targets, params, seed)?;
        Ok(Self {
            preprocessor,
            forest,
        })
    }

    pub fn transform(&self, batch: &FeatureBatch) -> Array2<f64> {
        self.preprocessor.transform(batch)
    }

    pub fn predict_proba(&self, batch: &FeatureBatch) -> Array1<f64> {
        self.forest.predict_proba(&self.preprocessor.transform(batch))
    }

    pub fn predict(&self, batch: &FeatureBatch) -> Array1<usize> {
        self.forest.predict(&self.preprocessor.transform(batch))
    }

    /// Mean accuracy against the given targets - the classifier's own score.
    pub fn score(&self, batch: &FeatureBatch, targets: &Array1<usize>) -> f64 {
        if batch.is_empty() {
            return 0.0;
        }
        let predictions = self.predict(batch);
        let correct = predictions
            .iter()
            .zip(targets.iter())
            .filter(|(p, t)| p == t)
            .count();
        correct as f64 / targets.len() as f64
    }

    pub fn output_names(&self) -> Vec<String> {
        self.preprocessor.output_names()
    }

    pub fn output_width(&self) -> usize {
        self.preprocessor.output_width()
    }

    pub fn feature_importances(&self) -> Option<Vec<f64>> {
        self.forest.feature_importances()
    }

    pub fn params(&self) -> &ForestParams {
        self.forest.params()
    }
}
