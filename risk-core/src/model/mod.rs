//! The trained model: tree ensemble, fitted pipeline, metadata document.

pub mod forest;
pub mod metadata;
pub mod pipeline;

pub use forest::{ForestClassifier, ForestParams};
pub use metadata::ModelMetadata;
pub use pipeline::ModelPipeline;
