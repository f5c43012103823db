//! Feature schema and record types.

pub mod layout;
pub mod record;

pub use record::{Day, FeatureBatch, FeatureRecord, Month};
