//! Persistence of the trained model and its metadata.
//!
//! The two artifacts are only meaningful as a pair, so they are written to
//! scratch files first and moved into place together; a failed run leaves
//! the models directory exactly as it was.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::{ServiceError, TrainError};
use crate::model::metadata::ModelMetadata;
use crate::model::pipeline::ModelPipeline;

pub const MODEL_FILE: &str = "model.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Write both artifacts into `dir`, atomically as a pair.
pub fn save(
    dir: &Path,
    pipeline: &ModelPipeline,
    metadata: &ModelMetadata,
) -> Result<(PathBuf, PathBuf), TrainError> {
    fs::create_dir_all(dir)?;

    let model_path = dir.join(MODEL_FILE);
    let metadata_path = dir.join(METADATA_FILE);
    let model_tmp = dir.join(format!("{MODEL_FILE}.tmp"));
    let metadata_tmp = dir.join(format!("{METADATA_FILE}.tmp"));

    let result = write_pair(pipeline, metadata, &model_tmp, &metadata_tmp);
    if let Err(err) = result {
        let _ = fs::remove_file(&model_tmp);
        let _ = fs::remove_file(&metadata_tmp);
        return Err(err);
    }

    fs::rename(&model_tmp, &model_path)?;
    if let Err(err) = fs::rename(&metadata_tmp, &metadata_path) {
        // Never leave a model without its metadata.
        let _ = fs::remove_file(&model_path);
        let _ = fs::remove_file(&metadata_tmp);
        return Err(err.into());
    }

    log::info!(
        "saved model to {} and metadata to {}",
        model_path.display(),
        metadata_path.display()
    );
    Ok((model_path, metadata_path))
}

fn write_pair(
    pipeline: &ModelPipeline,
    metadata: &ModelMetadata,
    model_tmp: &Path,
    metadata_tmp: &Path,
) -> Result<(), TrainError> {
    let model_file = BufWriter::new(File::create(model_tmp)?);
    serde_json::to_writer(model_file, pipeline)?;

    let metadata_file = BufWriter::new(File::create(metadata_tmp)?);
    serde_json::to_writer_pretty(metadata_file, metadata)?;
    Ok(())
}

/// Load both artifacts from `dir`.
pub fn load(dir: &Path) -> Result<(ModelPipeline, ModelMetadata), ServiceError> {
    let model_path = dir.join(MODEL_FILE);
    let metadata_path = dir.join(METADATA_FILE);
    for path in [&model_path, &metadata_path] {
        if !path.is_file() {
            return Err(ServiceError::ModelNotFound(path.clone()));
        }
    }

    let pipeline = serde_json::from_reader(BufReader::new(File::open(&model_path)?))
        .map_err(|e| ServiceError::Artifact(e.to_string()))?;
    let metadata = serde_json::from_reader(BufReader::new(File::open(&metadata_path)?))
        .map_err(|e| ServiceError::Artifact(e.to_string()))?;

    Ok((pipeline, metadata))
}
