//! Forest-fire risk core.
//!
//! Everything the risk system needs short of the HTTP surface: the feature
//! schema, dataset loading and label engineering, the preprocessing +
//! tree-ensemble pipeline, grid-search training, artifact persistence, run
//! tracking, and the model service consumed by the API server.

pub mod artifact;
pub mod config;
pub mod data;
pub mod error;
pub mod explain;
pub mod features;
pub mod model;
pub mod preprocess;
pub mod service;
pub mod tracking;
pub mod train;

pub use config::TrainingConfig;
pub use error::{DataError, ServiceError, TrainError};
pub use features::{Day, FeatureBatch, FeatureRecord, Month};
pub use model::{ForestParams, ModelMetadata, ModelPipeline};
pub use service::ModelService;
