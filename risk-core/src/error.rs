//! Error taxonomy for training and serving.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or interpreting tabular data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: invalid value '{value}' for column '{column}'")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("failed to fetch dataset: {0}")]
    Fetch(String),
}

/// Errors that abort a training run. Training is all-or-nothing: any of
/// these surfaces before artifacts are written.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("no 'area' column to derive the label and no '{0}' column given")]
    MissingLabel(String),

    #[error("class {class} has {count} samples but stratification needs at least {required}")]
    Stratification {
        class: usize,
        count: usize,
        required: usize,
    },

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("estimator error: {0}")]
    Estimator(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by the model service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("model artifact not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("model service has no model loaded")]
    NotReady,

    #[error(
        "model was trained against feature schema v{found_version} (hash {found_hash:08x}), \
         current schema is v{expected_version} (hash {expected_hash:08x})"
    )]
    SchemaMismatch {
        expected_version: u8,
        expected_hash: u32,
        found_version: u8,
        found_hash: u32,
    },

    #[error("failed to read model artifact: {0}")]
    Artifact(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
