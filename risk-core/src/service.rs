//! Model service - owns the one loaded model a serving process works with.
//!
//! `load` runs once at startup; after that every access is a shared read
//! over an immutable model, so concurrent callers never contend with a
//! writer. An instance starts unloaded and predictions fail fast until a
//! load succeeds.

use std::path::Path;

use parking_lot::RwLock;

use crate::artifact;
use crate::error::ServiceError;
use crate::explain;
use crate::features::{FeatureBatch, FeatureRecord};
use crate::model::metadata::ModelMetadata;
use crate::model::pipeline::ModelPipeline;

struct LoadedModel {
    pipeline: ModelPipeline,
    metadata: ModelMetadata,
    top_features: Vec<String>,
}

pub struct ModelService {
    inner: RwLock<Option<LoadedModel>>,
}

impl ModelService {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Read both artifacts from `dir` and make them the served model. On
    /// any failure the service keeps its previous state (unloaded for a
    /// fresh instance) and predictions keep failing fast.
    pub fn load(&self, dir: &Path) -> Result<(), ServiceError> {
        let (pipeline, metadata) = artifact::load(dir)?;
        metadata.validate_schema()?;

        // Importance ranking is a property of the fitted model; computing
        // it once here is what makes every response's explanation identical.
        let top_features = explain::top_features(&pipeline, explain::TOP_K);

        log::info!(
            "model loaded from {} (params {:?}, top features {:?})",
            dir.display(),
            metadata.best_params,
            top_features
        );

        *self.inner.write() = Some(LoadedModel {
            pipeline,
            metadata,
            top_features,
        });
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Positive-class probability for each record in the batch.
    pub fn predict_proba(&self, records: &[FeatureRecord]) -> Result<Vec<f64>, ServiceError> {
        let guard = self.inner.read();
        let loaded = guard.as_ref().ok_or(ServiceError::NotReady)?;
        let batch = FeatureBatch::from_records(records);
        Ok(loaded.pipeline.predict_proba(&batch).to_vec())
    }

    /// Hard class label for each record, by the classifier's own decision
    /// rule (ensemble majority vote - not the serving threshold).
    pub fn predict(&self, records: &[FeatureRecord]) -> Result<Vec<usize>, ServiceError> {
        let guard = self.inner.read();
        let loaded = guard.as_ref().ok_or(ServiceError::NotReady)?;
        let batch = FeatureBatch::from_records(records);
        Ok(loaded.pipeline.predict(&batch).to_vec())
    }

    /// The loaded model's top feature names, fixed at load time.
    pub fn top_features(&self) -> Result<Vec<String>, ServiceError> {
        let guard = self.inner.read();
        let loaded = guard.as_ref().ok_or(ServiceError::NotReady)?;
        Ok(loaded.top_features.clone())
    }

    pub fn metadata(&self) -> Option<ModelMetadata> {
        self.inner.read().as_ref().map(|m| m.metadata.clone())
    }
}

impl Default for ModelService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Day, Month};
    use crate::model::forest::ForestParams;
    use ndarray::Array1;

    fn record(temp: f64, month: Month) -> FeatureRecord {
        FeatureRecord {
            ffmc: temp * 3.0,
            dmc: 26.2,
            dc: 94.3,
            isi: 5.1,
            temp,
            rh: 45.0,
            wind: 4.3,
            rain: 0.0,
            month,
            day: Day::Fri,
        }
    }

    fn save_model(dir: &Path) {
        let mut records = Vec::new();
        let mut targets = Vec::new();
        for i in 0..10 {
            let hot = i % 2 == 1;
            records.push(record(
                if hot { 28.0 } else { 9.0 } + i as f64 * 0.2,
                if hot { Month::Aug } else { Month::Mar },
            ));
            targets.push(usize::from(hot));
        }
        let params = ForestParams {
            n_estimators: 8,
            max_depth: Some(4),
            min_samples_split: 2,
        };
        let pipeline = ModelPipeline::fit(
            &FeatureBatch::from_records(&records),
            &Array1::from_vec(targets),
            &params,
            5,
        )
        .unwrap();
        artifact::save(dir, &pipeline, &ModelMetadata::new("risk", params)).unwrap();
    }

    #[test]
    fn test_unloaded_service_fails_fast() {
        let service = ModelService::new();
        assert!(!service.is_ready());
        assert!(matches!(
            service.predict_proba(&[record(20.0, Month::Aug)]),
            Err(ServiceError::NotReady)
        ));
        assert!(matches!(service.top_features(), Err(ServiceError::NotReady)));
        assert!(service.metadata().is_none());
    }

    #[test]
    fn test_load_from_missing_dir_keeps_unloaded() {
        let dir = tempfile::tempdir().unwrap();
        let service = ModelService::new();

        assert!(matches!(
            service.load(dir.path()),
            Err(ServiceError::ModelNotFound(_))
        ));
        assert!(!service.is_ready());
    }

    #[test]
    fn test_load_and_predict() {
        let dir = tempfile::tempdir().unwrap();
        save_model(dir.path());

        let service = ModelService::new();
        service.load(dir.path()).unwrap();
        assert!(service.is_ready());

        let batch = [record(30.0, Month::Aug), record(8.0, Month::Mar)];
        let probabilities = service.predict_proba(&batch).unwrap();
        assert_eq!(probabilities.len(), 2);
        for p in &probabilities {
            assert!((0.0..=1.0).contains(p));
        }
        assert!(probabilities[0] > probabilities[1]);

        let labels = service.predict(&batch).unwrap();
        assert_eq!(labels, vec![1, 0]);
    }

    #[test]
    fn test_top_features_stable_across_calls() {
        let dir = tempfile::tempdir().unwrap();
        save_model(dir.path());

        let service = ModelService::new();
        service.load(dir.path()).unwrap();

        let first = service.top_features().unwrap();
        assert_eq!(first.len(), explain::TOP_K);
        assert_eq!(first, service.top_features().unwrap());
    }

    #[test]
    fn test_schema_mismatch_refused() {
        let dir = tempfile::tempdir().unwrap();
        save_model(dir.path());

        // Corrupt the schema hash in the metadata artifact.
        let metadata_path = dir.path().join(artifact::METADATA_FILE);
        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&metadata_path).unwrap()).unwrap();
        value["schema_version"] = serde_json::json!(99);
        std::fs::write(&metadata_path, value.to_string()).unwrap();

        let service = ModelService::new();
        assert!(matches!(
            service.load(dir.path()),
            Err(ServiceError::SchemaMismatch { .. })
        ));
        assert!(!service.is_ready());
    }
}
