//! Model metadata - the machine-readable companion to the serialized
//! pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::features::layout::{
    self, CATEGORICAL_FEATURES, FEATURE_NAMES, NUMERIC_FEATURES, SCHEMA_VERSION,
};
use crate::model::forest::ForestParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// All input features in model order.
    pub features: Vec<String>,
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub target: String,
    pub best_params: ForestParams,
    pub schema_version: u8,
    pub schema_hash: u32,
    pub trained_at: DateTime<Utc>,
}

impl ModelMetadata {
    pub fn new(target: &str, best_params: ForestParams) -> Self {
        Self {
            features: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            numeric: NUMERIC_FEATURES.iter().map(|n| n.to_string()).collect(),
            categorical: CATEGORICAL_FEATURES.iter().map(|n| n.to_string()).collect(),
            target: target.to_string(),
            best_params,
            schema_version: SCHEMA_VERSION,
            schema_hash: layout::schema_hash(),
            trained_at: Utc::now(),
        }
    }

    /// Refuse artifacts trained against a different feature layout.
    pub fn validate_schema(&self) -> Result<(), ServiceError> {
        if layout::is_schema_compatible(self.schema_version, self.schema_hash) {
            Ok(())
        } else {
            Err(ServiceError::SchemaMismatch {
                expected_version: SCHEMA_VERSION,
                expected_hash: layout::schema_hash(),
                found_version: self.schema_version,
                found_hash: self.schema_hash,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_mirrors_schema() {
        let metadata = ModelMetadata::new("risk", ForestParams::default());
        assert_eq!(metadata.features.len(), 10);
        assert_eq!(metadata.numeric.len(), 8);
        assert_eq!(metadata.categorical, vec!["month", "day"]);
        assert_eq!(metadata.target, "risk");
        assert!(metadata.validate_schema().is_ok());
    }

    #[test]
    fn test_schema_mismatch_detected() {
        let mut metadata = ModelMetadata::new("risk", ForestParams::default());
        metadata.schema_version += 1;
        assert!(matches!(
            metadata.validate_schema(),
            Err(ServiceError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_round_trips_through_json() {
        let metadata = ModelMetadata::new("risk", ForestParams::default());
        let json = serde_json::to_string(&metadata).unwrap();
        let back: ModelMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back.features, metadata.features);
        assert_eq!(back.best_params, metadata.best_params);
    }
}
