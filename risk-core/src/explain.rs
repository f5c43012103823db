//! Static global explanation: the most influential input features.
//!
//! The ranking comes from the ensemble's global feature importances, so it
//! is a property of the loaded model, not of any single request. One-hot
//! columns are folded back into their parent categorical so the result
//! always names one of the ten schema features.

use crate::features::layout::{self, CATEGORICAL_FEATURES, FEATURE_COUNT};
use crate::model::pipeline::ModelPipeline;

/// How many features a prediction response cites.
pub const TOP_K: usize = 3;

/// Served when the model cannot report importances.
pub const FALLBACK_FEATURES: [&str; 3] = ["FFMC", "DMC", "ISI"];

/// The top `k` schema feature names for a fitted pipeline. Falls back to
/// [`FALLBACK_FEATURES`] when the ensemble exposes no importances; the
/// fallback is logged so a capability regression is visible, but it is
/// never an error.
pub fn top_features(pipeline: &ModelPipeline, k: usize) -> Vec<String> {
    match ranked_features(pipeline) {
        Some(ranked) => ranked.into_iter().take(k).map(|(name, _)| name).collect(),
        None => {
            log::warn!("model exposes no feature importances, serving fallback explanation");
            FALLBACK_FEATURES
                .iter()
                .take(k)
                .map(|name| name.to_string())
                .collect()
        }
    }
}

/// All ten schema features with their aggregated importance, most important
/// first. Ties break on schema order, keeping the ranking deterministic.
pub fn ranked_features(pipeline: &ModelPipeline) -> Option<Vec<(String, f64)>> {
    let importances = pipeline.feature_importances()?;
    let names = pipeline.output_names();
    if names.len() != importances.len() {
        log::warn!(
            "importance vector ({}) does not match output columns ({})",
            importances.len(),
            names.len()
        );
        return None;
    }

    let mut totals = [0.0f64; FEATURE_COUNT];
    for (name, importance) in names.iter().zip(importances.iter()) {
        if let Some(index) = layout::feature_index(parent_feature(name)) {
            totals[index] += importance;
        }
    }

    let mut ranked: Vec<usize> = (0..FEATURE_COUNT).collect();
    ranked.sort_by(|&a, &b| {
        totals[b]
            .partial_cmp(&totals[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    Some(
        ranked
            .into_iter()
            .filter_map(|i| layout::feature_name(i).map(|name| (name.to_string(), totals[i])))
            .collect(),
    )
}

/// Map a transformed column name back onto its schema feature:
/// `month_aug` -> `month`, numeric columns map to themselves.
fn parent_feature(output_name: &str) -> &str {
    for categorical in CATEGORICAL_FEATURES {
        let is_one_hot = output_name
            .strip_prefix(categorical)
            .map_or(false, |rest| rest.starts_with('_'));
        if is_one_hot {
            return categorical;
        }
    }
    output_name
}
