//! One-hot encoding for a single categorical column.

use serde::{Deserialize, Serialize};

/// One-hot encoder whose category order is the order values were first seen
/// during fit. A value unseen at fit time encodes to all zeros rather than
/// an error, so inputs outside the training distribution still predict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEncoder {
    column: String,
    categories: Vec<String>,
}

impl CategoryEncoder {
    pub fn fit<'a>(column: &str, values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for value in values {
            if !categories.iter().any(|c| c == value) {
                categories.push(value.to_string());
            }
        }
        Self {
            column: column.to_string(),
            categories,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Number of output columns, fixed at fit time.
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Position of the hot column for a value, `None` for unseen values.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == value)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Output column names, e.g. `month_aug`.
    pub fn output_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{}_{}", self.column, c))
            .collect()
    }
}
