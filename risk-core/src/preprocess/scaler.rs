//! Per-column standardization.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Subtracts the per-column mean and divides by the per-column standard
/// deviation, both estimated from the data it was fitted on. A column with
/// zero variance is left unscaled (divisor 1.0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(data: &Array2<f64>) -> Self {
        let n = data.nrows().max(1) as f64;
        let mut means = Vec::with_capacity(data.ncols());
        let mut stds = Vec::with_capacity(data.ncols());

        for column in data.columns() {
            let mean = column.sum() / n;
            let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();
            means.push(mean);
            stds.push(if std > 0.0 { std } else { 1.0 });
        }

        Self { means, stds }
    }

    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        let mut out = data.clone();
        for (j, mut column) in out.columns_mut().into_iter().enumerate() {
            column.mapv_inplace(|v| (v - self.means[j]) / self.stds[j]);
        }
        out
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }
}
