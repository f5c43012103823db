//! Feature records - one observation of the weather/fuel-moisture indices.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::data::table::DataTable;
use crate::error::DataError;
use crate::features::layout::{NUMERIC_COUNT, NUMERIC_FEATURES};

/// Month of the observation, lowercase 3-letter code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::Jan => "jan",
            Month::Feb => "feb",
            Month::Mar => "mar",
            Month::Apr => "apr",
            Month::May => "may",
            Month::Jun => "jun",
            Month::Jul => "jul",
            Month::Aug => "aug",
            Month::Sep => "sep",
            Month::Oct => "oct",
            Month::Nov => "nov",
            Month::Dec => "dec",
        }
    }

    pub fn parse(value: &str) -> Option<Month> {
        Month::ALL.iter().copied().find(|m| m.as_str() == value)
    }
}

/// Day of week of the observation, lowercase 3-letter code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "mon",
            Day::Tue => "tue",
            Day::Wed => "wed",
            Day::Thu => "thu",
            Day::Fri => "fri",
            Day::Sat => "sat",
            Day::Sun => "sun",
        }
    }

    pub fn parse(value: &str) -> Option<Day> {
        Day::ALL.iter().copied().find(|d| d.as_str() == value)
    }
}

/// One observation. All ten fields are required; deserialization rejects a
/// record with a missing field or an out-of-enum categorical value before it
/// can reach the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "FFMC")]
    pub ffmc: f64,
    #[serde(rename = "DMC")]
    pub dmc: f64,
    #[serde(rename = "DC")]
    pub dc: f64,
    #[serde(rename = "ISI")]
    pub isi: f64,
    pub temp: f64,
    #[serde(rename = "RH")]
    pub rh: f64,
    pub wind: f64,
    pub rain: f64,
    pub month: Month,
    pub day: Day,
}

impl FeatureRecord {
    /// Numeric values in canonical column order.
    pub fn numeric_values(&self) -> [f64; NUMERIC_COUNT] {
        [
            self.ffmc, self.dmc, self.dc, self.isi, self.temp, self.rh, self.wind, self.rain,
        ]
    }
}

/// A batch of observations in columnar form, ready for the preprocessor.
#[derive(Debug, Clone)]
pub struct FeatureBatch {
    /// `n x 8` matrix of numeric features in canonical column order.
    pub numeric: Array2<f64>,
    pub month: Vec<Month>,
    pub day: Vec<Day>,
}

impl FeatureBatch {
    pub fn from_records(records: &[FeatureRecord]) -> Self {
        let mut numeric = Array2::zeros((records.len(), NUMERIC_COUNT));
        for (i, record) in records.iter().enumerate() {
            let values = record.numeric_values();
            for (j, value) in values.iter().enumerate() {
                numeric[[i, j]] = *value;
            }
        }
        Self {
            numeric,
            month: records.iter().map(|r| r.month).collect(),
            day: records.iter().map(|r| r.day).collect(),
        }
    }

    /// Extract the schema columns from a loaded table. Columns outside the
    /// schema (coordinates, `area`, a target) are ignored.
    pub fn from_table(table: &DataTable) -> Result<Self, DataError> {
        let mut numeric = Array2::zeros((table.n_rows(), NUMERIC_COUNT));
        for (j, name) in NUMERIC_FEATURES.iter().enumerate() {
            for (i, value) in table.numeric_column(name)?.into_iter().enumerate() {
                numeric[[i, j]] = value;
            }
        }

        let month = parse_categorical(table, "month", Month::parse)?;
        let day = parse_categorical(table, "day", Day::parse)?;

        Ok(Self {
            numeric,
            month,
            day,
        })
    }

    pub fn len(&self) -> usize {
        self.numeric.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A new batch holding only the given row indices.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            numeric: self.numeric.select(Axis(0), indices),
            month: indices.iter().map(|&i| self.month[i]).collect(),
            day: indices.iter().map(|&i| self.day[i]).collect(),
        }
    }
}

fn parse_categorical<T>(
    table: &DataTable,
    column: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, DataError> {
    table
        .string_column(column)?
        .iter()
        .enumerate()
        .map(|(row, value)| {
            parse(value).ok_or_else(|| DataError::InvalidValue {
                column: column.to_string(),
                row,
                value: value.to_string(),
            })
        })
        .collect()
}
