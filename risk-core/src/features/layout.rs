//! Feature layout - the canonical column definition.
//!
//! Column order is significant: the preprocessor, the trained model and the
//! serving path all align on the order defined here. Any change to the
//! names or their order must increment [`SCHEMA_VERSION`] so persisted
//! artifacts from an older layout are refused at load time.

use crc32fast::Hasher;

/// Current feature schema version.
pub const SCHEMA_VERSION: u8 = 1;

/// Numeric weather / fuel-moisture indices, in column order.
pub const NUMERIC_FEATURES: [&str; 8] = ["FFMC", "DMC", "DC", "ISI", "temp", "RH", "wind", "rain"];

/// Categorical columns, in column order.
pub const CATEGORICAL_FEATURES: [&str; 2] = ["month", "day"];

/// All input features in the order the model consumes them.
pub const FEATURE_NAMES: [&str; 10] = [
    "FFMC", "DMC", "DC", "ISI", "temp", "RH", "wind", "rain", "month", "day",
];

pub const NUMERIC_COUNT: usize = 8;
pub const FEATURE_COUNT: usize = 10;

/// CRC32 fingerprint of the schema (version + ordered names).
pub fn schema_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[SCHEMA_VERSION]);
    for name in FEATURE_NAMES {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Index of a feature in the canonical order.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|&n| n == name)
}

/// Feature name at a canonical index.
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_NAMES.get(index).copied()
}

/// Whether a persisted artifact matches the compiled schema.
pub fn is_schema_compatible(version: u8, hash: u32) -> bool {
    version == SCHEMA_VERSION && hash == schema_hash()
}
