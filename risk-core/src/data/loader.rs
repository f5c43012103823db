//! Dataset fetch and cache.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{DataError, TrainError};

/// File name the dataset is cached under inside the data directory.
pub const DATASET_FILENAME: &str = "forestfires.csv";

/// Resolve the configured dataset locator to a local CSV path. A locator
/// that already names a readable file is used as-is; otherwise it is treated
/// as a URL and downloaded into the data directory, once.
pub fn resolve_dataset(locator: &str, data_dir: &Path) -> Result<PathBuf, TrainError> {
    let local = Path::new(locator);
    if local.is_file() {
        return Ok(local.to_path_buf());
    }

    fs::create_dir_all(data_dir)?;
    let dest = data_dir.join(DATASET_FILENAME);
    if dest.is_file() {
        log::debug!("using cached dataset at {}", dest.display());
        return Ok(dest);
    }

    log::info!("downloading dataset from {locator}");
    let response = ureq::get(locator)
        .call()
        .map_err(|e| DataError::Fetch(e.to_string()))?;

    // Download into a scratch file so an interrupted transfer never
    // masquerades as a cached dataset.
    let partial = dest.with_extension("csv.part");
    let mut file = File::create(&partial)?;
    io::copy(&mut response.into_reader(), &mut file)?;
    fs::rename(&partial, &dest)?;

    log::info!("saved dataset to {}", dest.display());
    Ok(dest)
}
