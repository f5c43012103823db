//! A small string-typed table over a parsed CSV file.
//!
//! The training pipeline only ever touches a handful of known columns, so
//! values stay as strings until a typed column is requested.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::DataError;
use crate::features::layout::FEATURE_NAMES;

#[derive(Debug, Clone)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            rows.push(record?.iter().map(|v| v.to_string()).collect());
        }

        Ok(Self { columns, rows })
    }

    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        Self::from_reader(File::open(path)?)
    }

    /// Normalize header names so column lookups are stable regardless of how
    /// the source file was formatted: trim whitespace, then map any
    /// case-variant of a canonical feature name onto the canonical spelling;
    /// everything else is lowercased.
    pub fn normalize_columns(&mut self) {
        for column in &mut self.columns {
            let trimmed = column.trim();
            let canonical = FEATURE_NAMES
                .iter()
                .find(|name| name.eq_ignore_ascii_case(trimmed));
            *column = match canonical {
                Some(name) => name.to_string(),
                None => trimmed.to_ascii_lowercase(),
            };
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn string_column(&self, name: &str) -> Result<Vec<&str>, DataError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, DataError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, values)| {
                values[index]
                    .parse::<f64>()
                    .map_err(|_| DataError::InvalidValue {
                        column: name.to_string(),
                        row,
                        value: values[index].clone(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
 ffmc ,Month,AREA
86.2,aug,0.0
91.0,sep,10.5
";

    #[test]
    fn test_parse_and_normalize() {
        let mut table = DataTable::from_reader(CSV.as_bytes()).unwrap();
        table.normalize_columns();

        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.columns(), &["FFMC", "month", "area"]);
        assert!(table.has_column("FFMC"));
        assert!(!table.has_column("ffmc"));
    }

    #[test]
    fn test_typed_columns() {
        let mut table = DataTable::from_reader(CSV.as_bytes()).unwrap();
        table.normalize_columns();

        assert_eq!(table.numeric_column("FFMC").unwrap(), vec![86.2, 91.0]);
        assert_eq!(table.string_column("month").unwrap(), vec!["aug", "sep"]);
        assert!(matches!(
            table.numeric_column("missing"),
            Err(DataError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_invalid_numeric_value() {
        let table = DataTable::from_reader("FFMC\nnot-a-number\n".as_bytes()).unwrap();
        let err = table.numeric_column("FFMC").unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { row: 0, .. }));
    }
}
