//! Column-wise preprocessing: standardized numerics + one-hot categoricals.

pub mod encoder;
pub mod scaler;

pub use encoder::CategoryEncoder;
pub use scaler::StandardScaler;

use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::features::layout::{NUMERIC_COUNT, NUMERIC_FEATURES};
use crate::features::FeatureBatch;

/// The fitted column transform. Output layout: the eight numeric columns in
/// canonical order, then the `month` one-hot block, then the `day` one-hot
/// block. The output width is fixed by the categories seen at fit time,
/// never by the values being transformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    scaler: StandardScaler,
    month_encoder: CategoryEncoder,
    day_encoder: CategoryEncoder,
}

impl Preprocessor {
    pub fn fit(batch: &FeatureBatch) -> Self {
        Self {
            scaler: StandardScaler::fit(&batch.numeric),
            month_encoder: CategoryEncoder::fit(
                "month",
                batch.month.iter().map(|m| m.as_str()),
            ),
            day_encoder: CategoryEncoder::fit("day", batch.day.iter().map(|d| d.as_str())),
        }
    }

    pub fn transform(&self, batch: &FeatureBatch) -> Array2<f64> {
        let n = batch.len();
        let mut out = Array2::zeros((n, self.output_width()));

        out.slice_mut(s![.., 0..NUMERIC_COUNT])
            .assign(&self.scaler.transform(&batch.numeric));

        let month_base = NUMERIC_COUNT;
        let day_base = month_base + self.month_encoder.width();
        for i in 0..n {
            if let Some(j) = self.month_encoder.index_of(batch.month[i].as_str()) {
                out[[i, month_base + j]] = 1.0;
            }
            if let Some(j) = self.day_encoder.index_of(batch.day[i].as_str()) {
                out[[i, day_base + j]] = 1.0;
            }
        }

        out
    }

    pub fn output_width(&self) -> usize {
        NUMERIC_COUNT + self.month_encoder.width() + self.day_encoder.width()
    }

    /// Names of the transformed columns, aligned with [`transform`] output.
    pub fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = NUMERIC_FEATURES.iter().map(|n| n.to_string()).collect();
        names.extend(self.month_encoder.output_names());
        names.extend(self.day_encoder.output_names());
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Day, FeatureRecord, Month};

    fn record(temp: f64, month: Month, day: Day) -> FeatureRecord {
        FeatureRecord {
            ffmc: 86.2,
            dmc: 26.2,
            dc: 94.3,
            isi: 5.1,
            temp,
            rh: 45.0,
            wind: 4.3,
            rain: 0.0,
            month,
            day,
        }
    }

    fn fitted() -> Preprocessor {
        let batch = FeatureBatch::from_records(&[
            record(10.0, Month::Aug, Day::Fri),
            record(30.0, Month::Sep, Day::Fri),
        ]);
        Preprocessor::fit(&batch)
    }

    #[test]
    fn test_output_layout() {
        let pre = fitted();
        assert_eq!(pre.output_width(), 8 + 2 + 1);
        assert_eq!(
            pre.output_names(),
            vec![
                "FFMC", "DMC", "DC", "ISI", "temp", "RH", "wind", "rain", "month_aug",
                "month_sep", "day_fri"
            ]
        );
    }

    #[test]
    fn test_width_is_fixed_by_fit_not_by_input() {
        let pre = fitted();
        let unseen = FeatureBatch::from_records(&[record(20.0, Month::Jan, Day::Mon)]);
        let out = pre.transform(&unseen);

        assert_eq!(out.ncols(), pre.output_width());
        // Unknown month and day encode to all-zero one-hot blocks.
        assert_eq!(out[[0, 8]], 0.0);
        assert_eq!(out[[0, 9]], 0.0);
        assert_eq!(out[[0, 10]], 0.0);
    }

    #[test]
    fn test_known_categories_set_single_hot_column() {
        let pre = fitted();
        let batch = FeatureBatch::from_records(&[record(30.0, Month::Sep, Day::Fri)]);
        let out = pre.transform(&batch);

        assert_eq!(out[[0, 8]], 0.0);
        assert_eq!(out[[0, 9]], 1.0);
        assert_eq!(out[[0, 10]], 1.0);
        // temp was standardized against the fit data.
        assert_eq!(out[[0, 4]], 1.0);
    }
}
