//! Training configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::label::DEFAULT_AREA_THRESHOLD;
use crate::error::TrainError;
use crate::train::search::ParamGrid;

/// Immutable parameters of one training run, read from a TOML file; any
/// omitted key takes its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Dataset locator: a local CSV path, or a URL to download and cache.
    pub dataset_url: String,
    pub data_dir: PathBuf,
    pub models_dir: PathBuf,
    pub runs_dir: PathBuf,
    /// Fraction of rows held out for the test partition, in (0, 1).
    pub test_size: f64,
    pub random_state: u64,
    /// Burned area (hectares) above which a row is labelled a fire event.
    pub label_threshold_area: f64,
    /// Name of the binary target column.
    pub target: String,
    pub cv_folds: usize,
    pub grid: ParamGrid,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dataset_url:
                "https://archive.ics.uci.edu/ml/machine-learning-databases/forest-fires/forestfires.csv"
                    .to_string(),
            data_dir: PathBuf::from("data"),
            models_dir: PathBuf::from("models"),
            runs_dir: PathBuf::from("runs"),
            test_size: 0.2,
            random_state: 42,
            label_threshold_area: DEFAULT_AREA_THRESHOLD,
            target: "risk".to_string(),
            cv_folds: 3,
            grid: ParamGrid::default(),
        }
    }
}

impl TrainingConfig {
    pub fn from_file(path: &Path) -> Result<Self, TrainError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| TrainError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), TrainError> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TrainError::Config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.cv_folds < 2 {
            return Err(TrainError::Config(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        if !(self.label_threshold_area.is_finite() && self.label_threshold_area >= 0.0) {
            return Err(TrainError::Config(format!(
                "label_threshold_area must be a non-negative number, got {}",
                self.label_threshold_area
            )));
        }
        if self.target.is_empty() {
            return Err(TrainError::Config("target must not be empty".to_string()));
        }
        if self.grid.is_empty() {
            return Err(TrainError::Config(
                "hyperparameter grid has an empty dimension".to_string(),
            ));
        }
        if self.grid.n_estimators.iter().any(|&n| n == 0) {
            return Err(TrainError::Config(
                "n_estimators values must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
