//! Label engineering: derive the binary risk target.

use ndarray::Array1;

use crate::data::table::DataTable;
use crate::error::TrainError;

/// Column holding the continuous burned-area value in the source dataset.
pub const AREA_COLUMN: &str = "area";

/// Default burned-area threshold, in hectares, above which a row counts as
/// a fire event.
pub const DEFAULT_AREA_THRESHOLD: f64 = 0.2;

/// Produce the binary target column.
///
/// A burned-area column takes precedence: target = 1 iff `area >
/// area_threshold` (a row at exactly the threshold is negative). Without an
/// area column an existing target column is passed through unchanged - it is
/// assumed to already be binary and is not validated. With neither, training
/// cannot proceed.
pub fn engineer_label(
    table: &DataTable,
    target: &str,
    area_threshold: f64,
) -> Result<Array1<usize>, TrainError> {
    if table.has_column(AREA_COLUMN) {
        let areas = table.numeric_column(AREA_COLUMN)?;
        return Ok(areas
            .into_iter()
            .map(|area| usize::from(area > area_threshold))
            .collect());
    }

    if table.has_column(target) {
        let values = table.numeric_column(target)?;
        return Ok(values.into_iter().map(|v| v as usize).collect());
    }

    Err(TrainError::MissingLabel(target.to_string()))
}
