//! End-to-end training orchestration.

pub mod metrics;
pub mod search;

use std::path::PathBuf;

use chrono::Utc;
use ndarray::Axis;
use uuid::Uuid;

use crate::artifact;
use crate::config::TrainingConfig;
use crate::data::{label, loader, split, DataTable};
use crate::error::TrainError;
use crate::features::FeatureBatch;
use crate::model::forest::ForestParams;
use crate::model::metadata::ModelMetadata;
use crate::tracking::{RunRecord, RunRecorder, EXPERIMENT};
use self::metrics::Evaluation;

/// Everything a finished run reports back.
#[derive(Debug)]
pub struct TrainReport {
    pub run_id: String,
    pub best_params: ForestParams,
    pub cv_score: f64,
    pub evaluation: Evaluation,
    pub model_path: PathBuf,
    pub metadata_path: PathBuf,
}

/// Run the whole pipeline: fetch, load, label, split, search, evaluate,
/// persist, record. All-or-nothing; any error aborts before artifacts are
/// replaced.
pub fn run(config: &TrainingConfig) -> Result<TrainReport, TrainError> {
    config.validate()?;
    let started_at = Utc::now();

    let csv_path = loader::resolve_dataset(&config.dataset_url, &config.data_dir)?;
    let mut table = DataTable::from_path(&csv_path)?;
    table.normalize_columns();

    let targets = label::engineer_label(&table, &config.target, config.label_threshold_area)?;
    let features = FeatureBatch::from_table(&table)?;
    let positives = targets.iter().filter(|&&t| t == 1).count();
    log::info!(
        "loaded {} rows ({} positive) from {}",
        features.len(),
        positives,
        csv_path.display()
    );

    let (train_idx, test_idx) =
        split::stratified_split(&targets, config.test_size, config.random_state)?;
    log::info!(
        "split: {} train rows, {} test rows",
        train_idx.len(),
        test_idx.len()
    );

    let outcome = search::grid_search(
        &features.select(&train_idx),
        &targets.select(Axis(0), &train_idx),
        &config.grid,
        config.cv_folds,
        config.random_state,
    )?;

    let test_features = features.select(&test_idx);
    let test_targets = targets.select(Axis(0), &test_idx);
    let probabilities = outcome.pipeline.predict_proba(&test_features).to_vec();
    let predictions = outcome.pipeline.predict(&test_features).to_vec();
    let evaluation = metrics::evaluate(&probabilities, &predictions, &test_targets.to_vec());
    log::info!(
        "test evaluation: roc_auc {:.4}, accuracy {:.4}, weighted f1 {:.4}",
        evaluation.roc_auc,
        evaluation.accuracy,
        evaluation.weighted_f1
    );

    let metadata = ModelMetadata::new(&config.target, outcome.best_params);
    let (model_path, metadata_path) = artifact::save(&config.models_dir, &outcome.pipeline, &metadata)?;

    let run_id = Uuid::new_v4().to_string();
    let recorder = RunRecorder::new(&config.runs_dir)?;
    recorder.record(&RunRecord {
        run_id: run_id.clone(),
        experiment: EXPERIMENT.to_string(),
        started_at,
        finished_at: Utc::now(),
        params: serde_json::to_value(outcome.best_params)?,
        metrics: run_metrics(&evaluation, outcome.best_cv_score),
        artifacts: vec![
            model_path.display().to_string(),
            metadata_path.display().to_string(),
        ],
    })?;

    Ok(TrainReport {
        run_id,
        best_params: outcome.best_params,
        cv_score: outcome.best_cv_score,
        evaluation,
        model_path,
        metadata_path,
    })
}

fn run_metrics(
    evaluation: &Evaluation,
    cv_score: f64,
) -> std::collections::BTreeMap<String, f64> {
    let mut metrics = std::collections::BTreeMap::new();
    metrics.insert("cv_score".to_string(), cv_score);
    metrics.insert("roc_auc".to_string(), evaluation.roc_auc);
    metrics.insert("accuracy".to_string(), evaluation.accuracy);
    metrics.insert(
        "weighted_precision".to_string(),
        evaluation.weighted_precision,
    );
    metrics.insert("weighted_recall".to_string(), evaluation.weighted_recall);
    metrics.insert("weighted_f1".to_string(), evaluation.weighted_f1);
    metrics
}
